// Online Accounts GTK - UI Widgets
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reusable GTK4 widget components.

mod account_row;
mod provider_row;
mod status_pill;

pub use account_row::{provider_gicon, AccountRow};
pub use provider_row::ProviderRow;
