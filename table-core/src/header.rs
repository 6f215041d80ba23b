//! FILENAME: table-core/src/header.rs
//! Headers and header groups.
//!
//! Header groups are built bottom-up from the ordered, visible leaf columns:
//! each level wraps the level below in its parent columns, inserting
//! placeholder headers where a leaf column sits shallower than the deepest
//! branch. Headers are assembled in an index arena first, since a parent's
//! children are only known after the whole level is scanned.

use std::fmt;
use std::rc::{Rc, Weak};

use crate::column::Column;
use crate::feature::Extensions;
use crate::features::pinning::ColumnPosition;
use crate::table::Table;

pub struct Header<T: 'static> {
    pub id: String,
    /// Position within its header group.
    pub index: usize,
    pub depth: usize,
    pub column: Rc<Column<T>>,
    /// A filler header standing in for a column that does not reach this level.
    pub is_placeholder: bool,
    pub placeholder_id: Option<String>,
    pub col_span: usize,
    pub row_span: usize,
    pub sub_headers: Vec<Rc<Header<T>>>,
    pub header_group_id: Option<String>,
    /// The pinned section the header was built for, if any.
    pub position: Option<ColumnPosition>,
    pub extensions: Extensions,
}

pub struct HeaderGroup<T: 'static> {
    pub id: String,
    pub depth: usize,
    pub headers: Vec<Rc<Header<T>>>,
}

pub struct HeaderContext<T: 'static> {
    pub table: Weak<Table<T>>,
    pub header: Rc<Header<T>>,
    pub column: Rc<Column<T>>,
}

impl<T: 'static> Header<T> {
    /// The leaf headers under this header, left to right. A header with no
    /// sub-headers returns itself.
    pub fn get_leaf_headers(self: &Rc<Self>) -> Vec<Rc<Header<T>>> {
        if self.sub_headers.is_empty() {
            return vec![Rc::clone(self)];
        }
        self.sub_headers
            .iter()
            .flat_map(|sub| sub.get_leaf_headers())
            .collect()
    }

    pub fn get_context(self: &Rc<Self>, table: &Table<T>) -> HeaderContext<T> {
        HeaderContext {
            table: table.handle(),
            header: Rc::clone(self),
            column: Rc::clone(&self.column),
        }
    }

    /// Header text: the column's header template, else its accessor key,
    /// else its id when it has an accessor, else nothing.
    pub fn render_header(self: &Rc<Self>, table: &Table<T>) -> String {
        let def = &self.column.column_def;
        match &def.header {
            Some(renderer) => renderer.render(&self.get_context(table)),
            None => match (&def.accessor_key, &def.accessor_fn) {
                (Some(key), _) => key.clone(),
                (None, Some(_)) => self.column.id.clone(),
                (None, None) => String::new(),
            },
        }
    }

    pub fn render_footer(self: &Rc<Self>, table: &Table<T>) -> String {
        match &self.column.column_def.footer {
            Some(renderer) => renderer.render(&self.get_context(table)),
            None => String::new(),
        }
    }
}

impl<T: 'static> fmt::Debug for Header<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Header")
            .field("id", &self.id)
            .field("column", &self.column.id)
            .field("is_placeholder", &self.is_placeholder)
            .field("col_span", &self.col_span)
            .finish()
    }
}

// ============================================================================
// BUILDER
// ============================================================================

struct HeaderNode<T: 'static> {
    id: String,
    column: Rc<Column<T>>,
    depth: usize,
    index: usize,
    is_placeholder: bool,
    placeholder_id: Option<String>,
    sub_headers: Vec<usize>,
    col_span: usize,
    row_span: usize,
    header_group_id: Option<String>,
}

struct GroupNode {
    id: String,
    depth: usize,
    headers: Vec<usize>,
}

struct HeaderArena<'a, T: 'static> {
    table: &'a Table<T>,
    position: Option<ColumnPosition>,
    nodes: Vec<HeaderNode<T>>,
    groups: Vec<GroupNode>,
}

fn max_visible_depth<T: 'static>(table: &Table<T>, columns: &[Rc<Column<T>>], depth: usize) -> usize {
    let mut max_depth = depth;
    for column in columns.iter().filter(|c| c.get_is_visible(table)) {
        if !column.columns.is_empty() {
            max_depth = max_depth.max(max_visible_depth(table, &column.columns, depth + 1));
        }
    }
    max_depth
}

impl<'a, T: 'static> HeaderArena<'a, T> {
    fn push(&mut self, node: HeaderNode<T>) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    fn group_level(&mut self, headers_to_group: Vec<usize>, depth: usize) {
        let group_id = match self.position {
            Some(position) => format!("{}_{}", position.as_str(), depth),
            None => depth.to_string(),
        };
        let mut group = GroupNode {
            id: group_id.clone(),
            depth,
            headers: Vec::new(),
        };
        let mut pending: Vec<usize> = Vec::new();

        for header in headers_to_group {
            let header_column = Rc::clone(&self.nodes[header].column);
            let is_leaf_header = header_column.depth == depth;
            let (column, is_placeholder) = match (is_leaf_header, header_column.parent()) {
                (true, Some(parent)) => (parent, false),
                _ => (header_column, true),
            };

            let latest = pending.last().copied();
            match latest {
                Some(parent) if Rc::ptr_eq(&self.nodes[parent].column, &column) => {
                    self.nodes[parent].sub_headers.push(header);
                }
                _ => {
                    let mut id_parts: Vec<String> = Vec::with_capacity(4);
                    if let Some(position) = self.position {
                        id_parts.push(position.as_str().to_string());
                    }
                    if depth > 0 {
                        id_parts.push(depth.to_string());
                    }
                    id_parts.push(column.id.clone());
                    id_parts.push(self.nodes[header].id.clone());

                    let placeholder_id = is_placeholder.then(|| {
                        pending
                            .iter()
                            .filter(|&&p| Rc::ptr_eq(&self.nodes[p].column, &column))
                            .count()
                            .to_string()
                    });
                    let index = pending.len();
                    let parent = self.push(HeaderNode {
                        id: id_parts.join("_"),
                        column,
                        depth,
                        index,
                        is_placeholder,
                        placeholder_id,
                        sub_headers: vec![header],
                        col_span: 0,
                        row_span: 0,
                        header_group_id: None,
                    });
                    pending.push(parent);
                }
            }

            group.headers.push(header);
            self.nodes[header].header_group_id = Some(group_id.clone());
        }

        self.groups.push(group);

        if depth > 0 {
            self.group_level(pending, depth - 1);
        }
    }

    /// Returns (col_span, row_span) for each visible header in `headers`.
    fn assign_spans(&mut self, headers: &[usize]) -> Vec<(usize, usize)> {
        let visible: Vec<usize> = headers
            .iter()
            .copied()
            .filter(|&h| self.nodes[h].column.get_is_visible(self.table))
            .collect();

        visible
            .into_iter()
            .map(|h| {
                let children = self.nodes[h].sub_headers.clone();
                let (col_span, row_span) = if children.is_empty() {
                    (1, 1)
                } else {
                    let spans = self.assign_spans(&children);
                    let col_span = spans.iter().map(|(c, _)| c).sum();
                    let row_span = spans.iter().map(|(_, r)| *r).min().unwrap_or(0);
                    (col_span, row_span)
                };
                self.nodes[h].col_span = col_span;
                self.nodes[h].row_span = row_span;
                (col_span, row_span)
            })
            .collect()
    }

    fn finish(self) -> Vec<Rc<HeaderGroup<T>>> {
        let HeaderArena {
            table,
            position,
            nodes,
            groups,
        } = self;

        // Children always precede their parents in the arena.
        let mut built: Vec<Option<Rc<Header<T>>>> = Vec::with_capacity(nodes.len());
        for node in nodes {
            let sub_headers = node
                .sub_headers
                .iter()
                .filter_map(|&i| built.get(i).and_then(|h| h.clone()))
                .collect();
            let header = Header {
                id: node.id,
                index: node.index,
                depth: node.depth,
                column: node.column,
                is_placeholder: node.is_placeholder,
                placeholder_id: node.placeholder_id,
                col_span: node.col_span,
                row_span: node.row_span,
                sub_headers,
                header_group_id: node.header_group_id,
                position,
                extensions: Extensions::default(),
            };
            built.push(Some(table.create_header(header)));
        }

        groups
            .into_iter()
            .rev()
            .map(|group| {
                Rc::new(HeaderGroup {
                    id: group.id,
                    depth: group.depth,
                    headers: group
                        .headers
                        .iter()
                        .filter_map(|&i| built.get(i).and_then(|h| h.clone()))
                        .collect(),
                })
            })
            .collect()
    }
}

/// Builds the header groups for `columns_to_group` (ordered leaf columns),
/// top level first.
pub(crate) fn build_header_groups<T: 'static>(
    table: &Table<T>,
    all_columns: &[Rc<Column<T>>],
    columns_to_group: &[Rc<Column<T>>],
    position: Option<ColumnPosition>,
) -> Vec<Rc<HeaderGroup<T>>> {
    let max_depth = max_visible_depth(table, all_columns, 1);

    let mut arena = HeaderArena {
        table,
        position,
        nodes: Vec::new(),
        groups: Vec::new(),
    };

    let bottom: Vec<usize> = columns_to_group
        .iter()
        .enumerate()
        .map(|(index, column)| {
            arena.push(HeaderNode {
                id: column.id.clone(),
                column: Rc::clone(column),
                depth: max_depth,
                index,
                is_placeholder: false,
                placeholder_id: None,
                sub_headers: Vec::new(),
                col_span: 0,
                row_span: 0,
                header_group_id: None,
            })
        })
        .collect();

    arena.group_level(bottom, max_depth - 1);

    // The top level is the last group pushed.
    let top = arena
        .groups
        .last()
        .map(|group| group.headers.clone())
        .unwrap_or_default();
    arena.assign_spans(&top);

    arena.finish()
}
