//! FILENAME: table-core/src/feature.rs
//! Feature descriptors.
//!
//! A feature is a bundle of optional lifecycle hooks. The table runs the
//! built-in features first, then `TableOptions::features`, at each point
//! where it builds state, options or an entity. Custom features keep their
//! state in `TableState::custom` and decorate entities through their
//! `extensions` maps.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::cell::Cell;
use crate::column::Column;
use crate::header::Header;
use crate::options::TableOptions;
use crate::row::Row;
use crate::state::TableState;
use crate::table::Table;

/// Per-entity storage for values attached by custom features.
pub type Extensions = FxHashMap<String, serde_json::Value>;

pub type InitialStateHook = Rc<dyn Fn(&mut TableState)>;
pub type DefaultOptionsHook<T> = Rc<dyn Fn(&mut TableOptions<T>)>;
pub type CreateTableHook<T> = Rc<dyn Fn(&Table<T>)>;
pub type CreateColumnHook<T> = Rc<dyn Fn(&mut Column<T>, &Table<T>)>;
pub type CreateRowHook<T> = Rc<dyn Fn(&mut Row<T>, &Table<T>)>;
pub type CreateCellHook<T> = Rc<dyn Fn(&mut Cell<T>, &Table<T>)>;
pub type CreateHeaderHook<T> = Rc<dyn Fn(&mut Header<T>, &Table<T>)>;

pub struct TableFeature<T: 'static> {
    pub name: &'static str,
    /// Seeds this feature's slice of the initial state.
    pub get_initial_state: Option<InitialStateHook>,
    /// Fills option defaults. Must only write fields the host left unset.
    pub get_default_options: Option<DefaultOptionsHook<T>>,
    pub create_table: Option<CreateTableHook<T>>,
    pub create_column: Option<CreateColumnHook<T>>,
    pub create_row: Option<CreateRowHook<T>>,
    pub create_cell: Option<CreateCellHook<T>>,
    pub create_header: Option<CreateHeaderHook<T>>,
}

impl<T: 'static> TableFeature<T> {
    pub fn new(name: &'static str) -> Self {
        TableFeature {
            name,
            get_initial_state: None,
            get_default_options: None,
            create_table: None,
            create_column: None,
            create_row: None,
            create_cell: None,
            create_header: None,
        }
    }

    pub fn with_initial_state(mut self, f: impl Fn(&mut TableState) + 'static) -> Self {
        self.get_initial_state = Some(Rc::new(f));
        self
    }

    pub fn with_default_options(mut self, f: impl Fn(&mut TableOptions<T>) + 'static) -> Self {
        self.get_default_options = Some(Rc::new(f));
        self
    }

    pub fn on_create_table(mut self, f: impl Fn(&Table<T>) + 'static) -> Self {
        self.create_table = Some(Rc::new(f));
        self
    }

    pub fn on_create_column(mut self, f: impl Fn(&mut Column<T>, &Table<T>) + 'static) -> Self {
        self.create_column = Some(Rc::new(f));
        self
    }

    pub fn on_create_row(mut self, f: impl Fn(&mut Row<T>, &Table<T>) + 'static) -> Self {
        self.create_row = Some(Rc::new(f));
        self
    }

    pub fn on_create_cell(mut self, f: impl Fn(&mut Cell<T>, &Table<T>) + 'static) -> Self {
        self.create_cell = Some(Rc::new(f));
        self
    }

    pub fn on_create_header(mut self, f: impl Fn(&mut Header<T>, &Table<T>) + 'static) -> Self {
        self.create_header = Some(Rc::new(f));
        self
    }
}
