// Online Accounts GTK - List Adapters
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Display-independent list state behind the account and provider list boxes.
//!
//! - **AccountList**: sorted mirror of the service's accounts, with undoable removal
//! - **ProviderList**: branded-first provider ordering

pub mod account_list;
pub mod provider_list;
pub mod removal;

pub use account_list::{AccountList, ListChange, RemoveOutcome};
pub use provider_list::ProviderList;
pub use removal::RemovalTicket;
