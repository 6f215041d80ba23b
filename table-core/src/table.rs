//! FILENAME: table-core/src/table.rs
//! The table orchestrator.
//!
//! A `Table` owns the options, the state, the column tree and every memoized
//! derivation built on top of them. Feature behaviour lives in `features/*`
//! as further `impl` blocks on `Table`, `Column`, `Row`, `Cell` and `Header`;
//! this module only covers construction, state plumbing, column lookup and
//! the core row model entry points.
//!
//! The table is handed out as `Rc<Table<T>>` and keeps a weak handle to
//! itself so updaters and event handlers can reach it without borrowing.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use rustc_hash::{FxHashMap, FxHashSet};

use crate::cell::Cell;
use crate::column::Column;
use crate::column_def::{ColumnDef, Renderer};
use crate::error::{TableError, TableResult};
use crate::feature::TableFeature;
use crate::features::builtin_features;
use crate::header::{Header, HeaderGroup};
use crate::memo::{Memo, Ptr};
use crate::options::{ErrorMode, GroupedColumnMode, TableOptions};
use crate::row::Row;
use crate::row_model::RowModel;
use crate::state::{
    ColumnOrderState, ColumnPinningState, ColumnVisibilityState, GroupingState,
    RowSelectionState, TableState,
};
use crate::updater::{OnChangeFn, Updater};

pub type Columns<T> = Rc<Vec<Rc<Column<T>>>>;
pub type HeaderGroups<T> = Rc<Vec<Rc<HeaderGroup<T>>>>;
pub type Headers<T> = Rc<Vec<Rc<Header<T>>>>;

type ColumnsMemo<T, D> = Memo<D, Columns<T>>;
type HeaderGroupsDeps<T> = (Ptr<Vec<Rc<Column<T>>>>, Ptr<Vec<Rc<Column<T>>>>, ColumnPinningState);
type SelectionDeps<T> = (Ptr<RowModel<T>>, RowSelectionState);

/// Memoized table-level derivations, one cell per getter.
pub(crate) struct TableMemos<T: 'static> {
    pub(crate) all_leaf_columns: ColumnsMemo<
        T,
        (Ptr<Vec<Rc<Column<T>>>>, ColumnOrderState, GroupingState, GroupedColumnMode),
    >,
    pub(crate) visible_flat_columns: ColumnsMemo<T, (Ptr<Vec<Rc<Column<T>>>>, ColumnVisibilityState)>,
    pub(crate) visible_leaf_columns: ColumnsMemo<T, (Ptr<Vec<Rc<Column<T>>>>, ColumnVisibilityState)>,
    pub(crate) left_leaf_columns: ColumnsMemo<T, (Ptr<Vec<Rc<Column<T>>>>, ColumnPinningState)>,
    pub(crate) center_leaf_columns: ColumnsMemo<T, (Ptr<Vec<Rc<Column<T>>>>, ColumnPinningState)>,
    pub(crate) right_leaf_columns: ColumnsMemo<T, (Ptr<Vec<Rc<Column<T>>>>, ColumnPinningState)>,
    pub(crate) left_visible_leaf_columns: ColumnsMemo<T, (Ptr<Vec<Rc<Column<T>>>>, ColumnVisibilityState)>,
    pub(crate) center_visible_leaf_columns: ColumnsMemo<T, (Ptr<Vec<Rc<Column<T>>>>, ColumnVisibilityState)>,
    pub(crate) right_visible_leaf_columns: ColumnsMemo<T, (Ptr<Vec<Rc<Column<T>>>>, ColumnVisibilityState)>,

    pub(crate) header_groups: Memo<HeaderGroupsDeps<T>, HeaderGroups<T>>,
    pub(crate) left_header_groups: Memo<HeaderGroupsDeps<T>, HeaderGroups<T>>,
    pub(crate) center_header_groups: Memo<HeaderGroupsDeps<T>, HeaderGroups<T>>,
    pub(crate) right_header_groups: Memo<HeaderGroupsDeps<T>, HeaderGroups<T>>,
    pub(crate) footer_groups: Memo<Ptr<Vec<Rc<HeaderGroup<T>>>>, HeaderGroups<T>>,
    pub(crate) left_footer_groups: Memo<Ptr<Vec<Rc<HeaderGroup<T>>>>, HeaderGroups<T>>,
    pub(crate) center_footer_groups: Memo<Ptr<Vec<Rc<HeaderGroup<T>>>>, HeaderGroups<T>>,
    pub(crate) right_footer_groups: Memo<Ptr<Vec<Rc<HeaderGroup<T>>>>, HeaderGroups<T>>,
    pub(crate) flat_headers: Memo<Ptr<Vec<Rc<HeaderGroup<T>>>>, Headers<T>>,
    pub(crate) leaf_headers: Memo<
        (
            Ptr<Vec<Rc<HeaderGroup<T>>>>,
            Ptr<Vec<Rc<HeaderGroup<T>>>>,
            Ptr<Vec<Rc<HeaderGroup<T>>>>,
        ),
        Headers<T>,
    >,

    pub(crate) selected_row_model: Memo<SelectionDeps<T>, Rc<RowModel<T>>>,
    pub(crate) filtered_selected_row_model: Memo<SelectionDeps<T>, Rc<RowModel<T>>>,
    pub(crate) grouped_selected_row_model: Memo<SelectionDeps<T>, Rc<RowModel<T>>>,
}

impl<T: 'static> TableMemos<T> {
    fn new() -> Self {
        TableMemos {
            all_leaf_columns: Memo::new("table.get_all_leaf_columns"),
            visible_flat_columns: Memo::new("table.get_visible_flat_columns"),
            visible_leaf_columns: Memo::new("table.get_visible_leaf_columns"),
            left_leaf_columns: Memo::new("table.get_left_leaf_columns"),
            center_leaf_columns: Memo::new("table.get_center_leaf_columns"),
            right_leaf_columns: Memo::new("table.get_right_leaf_columns"),
            left_visible_leaf_columns: Memo::new("table.get_left_visible_leaf_columns"),
            center_visible_leaf_columns: Memo::new("table.get_center_visible_leaf_columns"),
            right_visible_leaf_columns: Memo::new("table.get_right_visible_leaf_columns"),
            header_groups: Memo::new("table.get_header_groups"),
            left_header_groups: Memo::new("table.get_left_header_groups"),
            center_header_groups: Memo::new("table.get_center_header_groups"),
            right_header_groups: Memo::new("table.get_right_header_groups"),
            footer_groups: Memo::new("table.get_footer_groups"),
            left_footer_groups: Memo::new("table.get_left_footer_groups"),
            center_footer_groups: Memo::new("table.get_center_footer_groups"),
            right_footer_groups: Memo::new("table.get_right_footer_groups"),
            flat_headers: Memo::new("table.get_flat_headers"),
            leaf_headers: Memo::new("table.get_leaf_headers"),
            selected_row_model: Memo::new("table.get_selected_row_model"),
            filtered_selected_row_model: Memo::new("table.get_filtered_selected_row_model"),
            grouped_selected_row_model: Memo::new("table.get_grouped_selected_row_model"),
        }
    }
}

/// The column tree plus the indexes derived from it when it is built.
struct ColumnTree<T: 'static> {
    all: Columns<T>,
    flat: Columns<T>,
    by_id: FxHashMap<String, Rc<Column<T>>>,
}

impl<T: 'static> ColumnTree<T> {
    fn empty() -> Self {
        ColumnTree {
            all: Rc::new(Vec::new()),
            flat: Rc::new(Vec::new()),
            by_id: FxHashMap::default(),
        }
    }
}

pub struct Table<T: 'static> {
    handle: Weak<Table<T>>,
    features: Vec<Rc<TableFeature<T>>>,
    options: RefCell<Rc<TableOptions<T>>>,
    initial_state: TableState,
    state: RefCell<TableState>,
    columns: RefCell<ColumnTree<T>>,
    pub(crate) memos: TableMemos<T>,
}

// ============================================================================
// CONSTRUCTION
// ============================================================================

impl<T: 'static> Table<T> {
    /// Builds a table: merges feature defaults into the options and the
    /// state, overlays `initial_state` and controlled `state`, then builds the
    /// column tree.
    pub fn new(options: TableOptions<T>) -> TableResult<Rc<Table<T>>> {
        let mut features = builtin_features::<T>();
        features.extend(options.features.iter().cloned());

        let options = apply_default_options(&features, options);

        let mut initial_state = TableState::default();
        for feature in &features {
            if let Some(hook) = &feature.get_initial_state {
                hook(&mut initial_state);
            }
        }
        if let Some(initial) = &options.initial_state {
            initial.overlay(&mut initial_state);
        }

        let mut state = initial_state.clone();
        if let Some(controlled) = &options.state {
            controlled.overlay(&mut state);
        }

        let table = Rc::new_cyclic(|handle| Table {
            handle: handle.clone(),
            features,
            options: RefCell::new(Rc::new(options)),
            initial_state,
            state: RefCell::new(state),
            columns: RefCell::new(ColumnTree::empty()),
            memos: TableMemos::new(),
        });

        table.rebuild_columns()?;

        for feature in &table.features {
            if let Some(hook) = &feature.create_table {
                hook(&table);
            }
        }

        log::debug!(
            "[table] created with {} rows, {} columns, {} features",
            table.options().data.len(),
            table.columns.borrow().flat.len(),
            table.features.len()
        );

        Ok(table)
    }

    /// A weak handle to this table, for closures that outlive a borrow.
    pub fn handle(&self) -> Weak<Table<T>> {
        self.handle.clone()
    }

    pub fn features(&self) -> &[Rc<TableFeature<T>>] {
        &self.features
    }

    pub fn options(&self) -> Rc<TableOptions<T>> {
        Rc::clone(&self.options.borrow())
    }

    /// Replaces the options. Feature defaults are re-applied, the column tree
    /// is rebuilt when the column definitions changed, and controlled state
    /// is overlaid again. On error nothing is changed.
    pub fn set_options(&self, updater: impl Into<Updater<TableOptions<T>>>) -> TableResult<()> {
        let current = self.options();
        let next = updater.into().apply(&current);
        let next = apply_default_options(&self.features, next);

        let columns_changed = !Rc::ptr_eq(&current.columns, &next.columns)
            || match (&current.default_column, &next.default_column) {
                (Some(a), Some(b)) => !Rc::ptr_eq(a, b),
                (None, None) => false,
                _ => true,
            };

        let next = Rc::new(next);
        if columns_changed {
            let tree = self.build_column_tree(&next)?;
            *self.options.borrow_mut() = next;
            *self.columns.borrow_mut() = tree;
        } else {
            *self.options.borrow_mut() = next;
        }

        let mut state = self.get_state();
        if let Some(controlled) = &self.options().state {
            controlled.overlay(&mut state);
        }
        *self.state.borrow_mut() = state;
        Ok(())
    }

    fn rebuild_columns(&self) -> TableResult<()> {
        let tree = self.build_column_tree(&self.options())?;
        *self.columns.borrow_mut() = tree;
        Ok(())
    }

    fn build_column_tree(&self, options: &TableOptions<T>) -> TableResult<ColumnTree<T>> {
        let defaults = options.default_column.as_deref();
        let all = self.build_columns(&options.columns, 0, Weak::new(), defaults, options.error_mode)?;

        let flat: Vec<Rc<Column<T>>> = all.iter().flat_map(|c| c.get_flat_columns()).collect();

        let mut by_id: FxHashMap<String, Rc<Column<T>>> = FxHashMap::default();
        let mut seen: FxHashSet<&str> = FxHashSet::default();
        for column in &flat {
            if !seen.insert(column.id.as_str()) {
                match options.error_mode {
                    ErrorMode::Strict => return Err(TableError::DuplicateColumnId(column.id.clone())),
                    ErrorMode::Lenient => {
                        log::warn!("[table] duplicate column id '{}'; keeping the first", column.id);
                        continue;
                    }
                }
            }
            by_id.insert(column.id.clone(), Rc::clone(column));
        }

        log::debug!("[table] built {} columns ({} top-level)", flat.len(), all.len());

        Ok(ColumnTree {
            all: Rc::new(all),
            flat: Rc::new(flat),
            by_id,
        })
    }

    fn build_columns(
        &self,
        defs: &[ColumnDef<T>],
        depth: usize,
        parent: Weak<Column<T>>,
        defaults: Option<&ColumnDef<T>>,
        error_mode: ErrorMode,
    ) -> TableResult<Vec<Rc<Column<T>>>> {
        let mut columns = Vec::with_capacity(defs.len());
        for (index, def) in defs.iter().enumerate() {
            let def = match defaults {
                Some(defaults) => def.merged_over(defaults),
                None => def.clone(),
            };
            let id = resolve_column_id(&def, depth, index, error_mode)?;

            let mut failure: Option<TableError> = None;
            let column = Rc::new_cyclic(|weak_self| {
                let children = match self.build_columns(
                    &def.columns,
                    depth + 1,
                    weak_self.clone(),
                    defaults,
                    error_mode,
                ) {
                    Ok(children) => children,
                    Err(err) => {
                        failure = Some(err);
                        Vec::new()
                    }
                };
                let mut column = Column::new(id, depth, index, def, parent.clone());
                column.columns = children;
                for feature in &self.features {
                    if let Some(hook) = &feature.create_column {
                        hook(&mut column, self);
                    }
                }
                column
            });
            if let Some(err) = failure {
                return Err(err);
            }
            columns.push(column);
        }
        Ok(columns)
    }
}

fn apply_default_options<T: 'static>(
    features: &[Rc<TableFeature<T>>],
    mut options: TableOptions<T>,
) -> TableOptions<T> {
    for feature in features {
        if let Some(hook) = &feature.get_default_options {
            hook(&mut options);
        }
    }
    options
}

/// Explicit id, else the accessor key verbatim, else a text header.
fn resolve_column_id<T: 'static>(
    def: &ColumnDef<T>,
    depth: usize,
    index: usize,
    error_mode: ErrorMode,
) -> TableResult<String> {
    if let Some(id) = def.id.as_ref().filter(|id| !id.is_empty()) {
        return Ok(id.clone());
    }
    if let Some(key) = def.accessor_key.as_ref().filter(|key| !key.is_empty()) {
        return Ok(key.clone());
    }
    if let Some(Renderer::Text(header)) = &def.header {
        if !header.is_empty() {
            return Ok(header.clone());
        }
    }

    match error_mode {
        ErrorMode::Strict if def.accessor_fn.is_some() => {
            Err(TableError::AccessorFnWithoutId { depth, index })
        }
        ErrorMode::Strict => Err(TableError::MissingColumnId { depth, index }),
        ErrorMode::Lenient => {
            let fallback = format!("column_{}_{}", depth, index);
            log::warn!(
                "[table] column at depth {} index {} has no resolvable id; using '{}'",
                depth,
                index,
                fallback
            );
            Ok(fallback)
        }
    }
}

// ============================================================================
// STATE
// ============================================================================

impl<T: 'static> Table<T> {
    /// The state as merged at construction from feature defaults and
    /// `initial_state`. Reset operations return to this.
    pub fn initial_state(&self) -> &TableState {
        &self.initial_state
    }

    pub fn get_state(&self) -> TableState {
        self.state.borrow().clone()
    }

    /// Reads the current state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&TableState) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Routes a whole-state write to `on_state_change` when set, otherwise
    /// applies it internally.
    pub fn set_state(&self, updater: impl Into<Updater<TableState>>) {
        let updater = updater.into();
        match self.options().on_state_change.clone() {
            Some(on_change) => on_change(updater),
            None => self.apply_state(updater),
        }
    }

    /// Writes the internal state directly, bypassing change handlers.
    /// Controlled slices from `TableOptions::state` still win.
    pub fn apply_state(&self, updater: impl Into<Updater<TableState>>) {
        let previous = self.get_state();
        let mut next = updater.into().apply(&previous);
        if let Some(controlled) = &self.options().state {
            controlled.overlay(&mut next);
        }
        *self.state.borrow_mut() = next;
    }

    /// Back to the initial state.
    pub fn reset(&self) {
        let initial = self.initial_state.clone();
        self.set_state(initial);
    }

    /// Writes one state slice: its own change handler first, then the
    /// table-wide handler, then internal state.
    pub(crate) fn update_slice<S: Clone + 'static>(
        &self,
        slice: &'static str,
        updater: Updater<S>,
        on_change: Option<OnChangeFn<S>>,
        lens: fn(&mut TableState) -> &mut S,
    ) {
        if let Some(on_change) = on_change {
            log::trace!("[state] {} -> slice handler", slice);
            on_change(updater);
            return;
        }

        let whole = Updater::from_fn(move |old: &TableState| {
            let mut next = old.clone();
            let previous = lens(&mut next).clone();
            *lens(&mut next) = updater.apply(&previous);
            next
        });

        if let Some(on_change) = self.options().on_state_change.clone() {
            log::trace!("[state] {} -> table handler", slice);
            on_change(whole);
        } else {
            log::trace!("[state] {} -> internal", slice);
            self.apply_state(whole);
        }
    }
}

// ============================================================================
// COLUMNS
// ============================================================================

impl<T: 'static> Table<T> {
    /// Top-level columns in definition order.
    pub fn get_all_columns(&self) -> Columns<T> {
        Rc::clone(&self.columns.borrow().all)
    }

    /// Every column, depth-first, parents before children.
    pub fn get_all_flat_columns(&self) -> Columns<T> {
        Rc::clone(&self.columns.borrow().flat)
    }

    /// Every leaf column in display order (see `order_columns`).
    pub fn get_all_leaf_columns(&self) -> Columns<T> {
        let all = self.get_all_columns();
        let mode = self.options().grouped_column_mode;
        let deps = self.with_state(|state| {
            (
                Ptr::new(&all),
                state.column_order.clone(),
                state.grouping.clone(),
                mode,
            )
        });
        self.memos
            .all_leaf_columns
            .get(deps, |(all, column_order, grouping, mode)| {
                let leaves: Vec<Rc<Column<T>>> = all
                    .iter()
                    .flat_map(|column| column.get_leaf_columns(self).as_ref().clone())
                    .collect();
                Rc::new(crate::features::ordering::order_columns(
                    leaves,
                    column_order,
                    grouping,
                    *mode,
                ))
            })
    }

    /// Looks a column up by id, logging a warning when it does not exist.
    pub fn get_column(&self, id: &str) -> Option<Rc<Column<T>>> {
        let column = self.find_column(id);
        if column.is_none() {
            log::warn!("[table] column with id '{}' does not exist", id);
        }
        column
    }

    /// Silent lookup for ids that may legitimately be stale, such as ids
    /// held in state.
    pub(crate) fn find_column(&self, id: &str) -> Option<Rc<Column<T>>> {
        self.columns.borrow().by_id.get(id).cloned()
    }
}

// ============================================================================
// ROWS, CELLS, HEADERS
// ============================================================================

impl<T: 'static> Table<T> {
    /// Finds a row by id among every core row when `search_all`, otherwise
    /// among the rendered rows only.
    pub fn get_row(&self, id: &str, search_all: bool) -> TableResult<Rc<Row<T>>> {
        let model = if search_all {
            self.get_core_row_model()
        } else {
            self.get_row_model()
        };
        model
            .rows_by_id
            .get(id)
            .cloned()
            .ok_or_else(|| TableError::RowNotFound(id.to_string()))
    }

    /// Silent lookup across the pre-pagination rows, which include grouped
    /// rows, then the core rows.
    pub(crate) fn find_row(&self, id: &str) -> Option<Rc<Row<T>>> {
        if let Some(row) = self.get_pre_pagination_row_model().rows_by_id.get(id) {
            return Some(Rc::clone(row));
        }
        self.get_core_row_model().rows_by_id.get(id).cloned()
    }

    /// Runs the `create_row` hooks and freezes the row.
    pub fn create_row(&self, mut row: Row<T>) -> Rc<Row<T>> {
        for feature in &self.features {
            if let Some(hook) = &feature.create_row {
                hook(&mut row, self);
            }
        }
        Rc::new(row)
    }

    pub fn create_cell(&self, row: &Rc<Row<T>>, column: &Rc<Column<T>>) -> Rc<Cell<T>> {
        let mut cell = Cell::new(row, column);
        for feature in &self.features {
            if let Some(hook) = &feature.create_cell {
                hook(&mut cell, self);
            }
        }
        Rc::new(cell)
    }

    pub(crate) fn create_header(&self, mut header: Header<T>) -> Rc<Header<T>> {
        for feature in &self.features {
            if let Some(hook) = &feature.create_header {
                hook(&mut header, self);
            }
        }
        Rc::new(header)
    }
}

// ============================================================================
// ROW MODEL PIPELINE
// ============================================================================

impl<T: 'static> Table<T> {
    pub fn get_core_row_model(&self) -> Rc<RowModel<T>> {
        let core = Rc::clone(&self.options().get_core_row_model);
        core(self)
    }

    /// The final, rendered rows.
    pub fn get_row_model(&self) -> Rc<RowModel<T>> {
        self.get_pagination_row_model()
    }
}

impl<T: 'static> fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("columns", &self.columns.borrow().flat.len())
            .field("state", &*self.state.borrow())
            .finish()
    }
}
