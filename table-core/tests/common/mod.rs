//! FILENAME: tests/common/mod.rs
//! Fixtures shared by the table-core integration tests.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use table_core::{
    expanded_row_model, filtered_row_model, grouped_row_model, pagination_row_model,
    sorted_row_model, CellValue, ColumnDef, Record, Table, TableOptions,
};

/// A person record, the usual demo data set for table UIs.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub visits: u32,
    pub status: &'static str,
    pub sub_rows: Vec<Rc<Person>>,
}

impl Person {
    pub fn new(first_name: &str, last_name: &str, age: u32, visits: u32, status: &'static str) -> Self {
        Person {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            age,
            visits,
            status,
            sub_rows: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Person>) -> Self {
        self.sub_rows = children.into_iter().map(Rc::new).collect();
        self
    }
}

impl Record for Person {
    fn field(&self, key: &str) -> CellValue {
        match key {
            "first_name" => CellValue::text(&self.first_name),
            "last_name" => CellValue::text(&self.last_name),
            "age" => CellValue::from(self.age),
            "visits" => CellValue::from(self.visits),
            "status" => CellValue::text(self.status),
            _ => CellValue::Empty,
        }
    }
}

/// Eight flat records with repeated statuses and distinct ages.
pub fn people() -> Vec<Person> {
    vec![
        Person::new("Tanner", "Linsley", 33, 100, "single"),
        Person::new("Kevin", "Vandy", 27, 200, "complicated"),
        Person::new("Joe", "Dirte", 45, 20, "single"),
        Person::new("Ann", "Marsh", 19, 5, "relationship"),
        Person::new("Lee", "Chu", 52, 70, "complicated"),
        Person::new("Mia", "Rossi", 38, 140, "single"),
        Person::new("Omar", "Haddad", 24, 90, "relationship"),
        Person::new("Zoe", "Park", 61, 15, "single"),
    ]
}

/// Two parents with children, plus a childless row.
pub fn families() -> Vec<Person> {
    vec![
        Person::new("Pat", "Parent", 50, 1, "single").with_children(vec![
            Person::new("Cleo", "Child", 20, 2, "single"),
            Person::new("Cal", "Child", 18, 3, "single"),
        ]),
        Person::new("Rae", "Parent", 48, 4, "complicated")
            .with_children(vec![Person::new("Rio", "Child", 16, 5, "single")]),
        Person::new("Sol", "Solo", 30, 6, "relationship"),
    ]
}

/// `first_name`, `last_name`, `age`, `visits`, `status` as flat leaf columns.
pub fn person_columns() -> Vec<ColumnDef<Person>> {
    vec![
        ColumnDef::accessor("first_name"),
        ColumnDef::accessor("last_name"),
        ColumnDef::accessor("age"),
        ColumnDef::accessor("visits"),
        ColumnDef::accessor("status"),
    ]
}

/// The same leaves grouped under "name" and "info" header groups.
pub fn grouped_person_columns() -> Vec<ColumnDef<Person>> {
    vec![
        ColumnDef::group(
            "name",
            vec![ColumnDef::accessor("first_name"), ColumnDef::accessor("last_name")],
        ),
        ColumnDef::group(
            "info",
            vec![
                ColumnDef::accessor("age"),
                ColumnDef::group(
                    "more",
                    vec![ColumnDef::accessor("visits"), ColumnDef::accessor("status")],
                ),
            ],
        ),
    ]
}

/// Options with every pipeline stage registered.
pub fn full_pipeline(data: Vec<Person>) -> TableOptions<Person> {
    TableOptions::new(data, person_columns())
        .with_sub_rows(|person: &Person, _| {
            (!person.sub_rows.is_empty()).then(|| person.sub_rows.clone())
        })
        .with_filtered_row_model(filtered_row_model())
        .with_grouped_row_model(grouped_row_model())
        .with_sorted_row_model(sorted_row_model())
        .with_expanded_row_model(expanded_row_model())
        .with_pagination_row_model(pagination_row_model())
}

pub fn table(options: TableOptions<Person>) -> Rc<Table<Person>> {
    Table::new(options).expect("table construction")
}

/// A column whose accessor counts its invocations.
pub fn counting_column(id: &str, calls: Rc<Cell<usize>>) -> ColumnDef<Person> {
    ColumnDef::accessor_fn(id, move |person: &Person| {
        calls.set(calls.get() + 1);
        CellValue::text(format!("{} {}", person.first_name, person.last_name))
    })
}

/// Ids of `rows`, in order.
pub fn ids<T: 'static>(rows: &[Rc<table_core::Row<T>>]) -> Vec<String> {
    rows.iter().map(|row| row.id.clone()).collect()
}

/// Asserts the row model index invariant: `flat_rows` is the pre-order
/// walk of `rows` and `rows_by_id` holds exactly those ids.
pub fn assert_row_model_consistent<T: 'static>(model: &table_core::RowModel<T>) {
    fn walk<T: 'static>(rows: &[Rc<table_core::Row<T>>], out: &mut Vec<String>) {
        for row in rows {
            if !out.contains(&row.id) {
                out.push(row.id.clone());
            }
            walk(&row.sub_rows, out);
        }
    }
    let mut expected = Vec::new();
    walk(&model.rows, &mut expected);
    assert_eq!(ids(&model.flat_rows), expected);
    assert_eq!(model.rows_by_id.len(), model.flat_rows.len());
    for row in &model.flat_rows {
        assert!(model.rows_by_id.contains_key(&row.id), "missing {}", row.id);
    }
}
