// Online Accounts GTK - UI Module
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! User interface components.

mod main_window;
pub mod network;
pub mod pages;
mod shell;
pub mod widgets;

pub use main_window::MainWindow;
