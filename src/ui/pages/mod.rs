// Online Accounts GTK - UI Pages Module
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Main content pages for the application.

mod account_detail;
mod accounts_page;
mod providers_page;

pub use account_detail::{AccountDetailPage, DETAIL_PAGE_TAG};
pub use accounts_page::AccountsPage;
pub use providers_page::ProvidersPage;
