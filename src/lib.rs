// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod categories;
pub mod cli;
pub mod commands;
pub mod config;
pub mod db;
pub mod error;
pub mod goals;
pub mod history;
pub mod models;
pub mod records;
pub mod session;
pub mod tags;
pub mod utils;

pub use config::Config;
pub use error::{LedgerError, Result};
pub use history::{OperationKind, Pending};
pub use models::{
    DateRange, EntryDraft, Field, Filter, FilterOp, FilterValue, LedgerEntry, SortOrder, Tag,
    TagPatch,
};
pub use session::{LedgerReader, Session};
