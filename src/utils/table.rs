// src/utils/table.rs

//! Terminal tables for list views.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::models::{Course, Department, Student};

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn status_cell(active: bool) -> Cell {
    if active {
        Cell::new("Active").fg(Color::Green)
    } else {
        Cell::new("Inactive").fg(Color::Red)
    }
}

fn header(columns: &[&str]) -> Vec<Cell> {
    columns
        .iter()
        .map(|c| Cell::new(c).add_attribute(Attribute::Bold))
        .collect()
}

pub fn students_table(students: &[Student]) -> Table {
    let mut table = Table::new();
    table.set_header(header(&[
        "Student ID",
        "Name",
        "Email",
        "Department",
        "Courses",
        "Status",
    ]));
    apply_table_style(&mut table);
    for student in students {
        table.add_row(vec![
            Cell::new(&student.student_id),
            Cell::new(student.full_name()),
            Cell::new(&student.email),
            Cell::new(
                student
                    .department
                    .as_ref()
                    .map(|d| d.name.replace('_', " "))
                    .unwrap_or_default(),
            ),
            Cell::new(student.course_names()),
            status_cell(student.active),
        ]);
    }
    table
}

pub fn departments_table(departments: &[Department]) -> Table {
    let mut table = Table::new();
    table.set_header(header(&["ID", "Name", "Courses", "Status"]));
    apply_table_style(&mut table);
    for department in departments {
        table.add_row(vec![
            Cell::new(department.id),
            Cell::new(department.display_name()),
            Cell::new(department.courses.len()),
            status_cell(department.active),
        ]);
    }
    table
}

pub fn courses_table(courses: &[Course]) -> Table {
    let mut table = Table::new();
    table.set_header(header(&["ID", "Name", "Description", "Status"]));
    apply_table_style(&mut table);
    for course in courses {
        table.add_row(vec![
            Cell::new(course.id),
            Cell::new(&course.name),
            Cell::new(course.description.as_deref().unwrap_or("")),
            status_cell(course.active),
        ]);
    }
    table
}
