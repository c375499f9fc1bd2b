use eframe::egui::{self, Align2, RichText, Window};
use egui_phosphor::regular as icons;
use egui_popover_menu::{PopoverItem, PopoverMenu, PopoverMenuBuilder};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::catalog::CatalogFetcher;
use crate::config::CatalogConfig;

/// Actions a sheet popover can fire.
#[derive(Clone, Debug, PartialEq)]
pub enum SheetAction {
    SortAscending,
    SortDescending,
    ClearValues,
    HideColumn,
    ShowColumn,
    DeleteColumn,
    InsertBlankRow,
    DuplicateLastRow,
    InsertProduct(String),
}

struct Column {
    name: String,
    hidden: bool,
}

impl Column {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            hidden: false,
        }
    }
}

pub struct DemoApp {
    columns: Vec<Column>,
    rows: Vec<Vec<String>>,
    active_column: usize,
    /// Mirrors the active column's hidden flag for the menu's predicates.
    column_hidden: Arc<AtomicBool>,
    column_menu: PopoverMenu<SheetAction>,
    insert_menu: PopoverMenu<SheetAction>,
}

impl DemoApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        // Setup fonts
        let mut fonts = egui::FontDefinitions::default();
        egui_phosphor::add_to_fonts(&mut fonts, egui_phosphor::Variant::Regular);
        cc.egui_ctx.set_fonts(fonts);

        let column_hidden = Arc::new(AtomicBool::new(false));
        let column_menu = Self::build_column_menu(column_hidden.clone());

        let config = CatalogConfig::load();
        let insert_menu = PopoverMenuBuilder::new()
            .action_with_icon(icons::ROWS, "Blank row", SheetAction::InsertBlankRow)
            .action_with_icon(icons::COPY, "Duplicate last row", SheetAction::DuplicateLastRow)
            .build_remote(CatalogFetcher::new(config));

        Self {
            columns: vec![Column::new("Name"), Column::new("Category"), Column::new("Price")],
            rows: vec![
                vec!["Desk Mat".into(), "office".into(), "12.50".into()],
                vec!["Monitor Arm".into(), "office".into(), "49.90".into()],
            ],
            active_column: 0,
            column_hidden,
            column_menu,
            insert_menu,
        }
    }

    fn build_column_menu(hidden: Arc<AtomicBool>) -> PopoverMenu<SheetAction> {
        let hidden_for_hide = hidden.clone();
        let hidden_for_show = hidden;
        PopoverMenuBuilder::new()
            .action_with_icon(icons::SORT_ASCENDING, "Sort A to Z", SheetAction::SortAscending)
            .action_with_icon(icons::SORT_DESCENDING, "Sort Z to A", SheetAction::SortDescending)
            .item(
                PopoverItem::new("Hide column", SheetAction::HideColumn)
                    .with_icon(icons::EYE_SLASH)
                    .hide_when(move || hidden_for_hide.load(Ordering::Relaxed)),
            )
            .item(
                PopoverItem::new("Show column", SheetAction::ShowColumn)
                    .with_icon(icons::EYE)
                    .hide_when(move || !hidden_for_show.load(Ordering::Relaxed)),
            )
            .confirmed_action(icons::ERASER, "Clear values", SheetAction::ClearValues)
            .confirmed_action(icons::TRASH, "Delete column", SheetAction::DeleteColumn)
            .build_local()
    }

    fn toggle_column_menu(&mut self) {
        if self.column_menu.is_open() {
            self.column_menu.close();
        } else {
            self.insert_menu.close();
            let hidden = self
                .columns
                .get(self.active_column)
                .map(|c| c.hidden)
                .unwrap_or(false);
            self.column_hidden.store(hidden, Ordering::Relaxed);
            self.column_menu.open();
        }
    }

    fn toggle_insert_menu(&mut self) {
        if self.insert_menu.is_open() {
            self.insert_menu.close();
        } else {
            self.column_menu.close();
            self.insert_menu.open();
        }
    }

    fn apply_action(&mut self, action: SheetAction) {
        match action {
            SheetAction::SortAscending => self.sort_rows(true),
            SheetAction::SortDescending => self.sort_rows(false),
            SheetAction::ClearValues => {
                for row in &mut self.rows {
                    if let Some(cell) = row.get_mut(self.active_column) {
                        cell.clear();
                    }
                }
            }
            SheetAction::HideColumn => self.set_column_hidden(true),
            SheetAction::ShowColumn => self.set_column_hidden(false),
            SheetAction::DeleteColumn => {
                if self.columns.len() > 1 {
                    self.columns.remove(self.active_column);
                    for row in &mut self.rows {
                        if self.active_column < row.len() {
                            row.remove(self.active_column);
                        }
                    }
                    self.active_column = 0;
                }
            }
            SheetAction::InsertBlankRow => {
                self.rows.push(vec![String::new(); self.columns.len()]);
            }
            SheetAction::DuplicateLastRow => {
                if let Some(last) = self.rows.last().cloned() {
                    self.rows.push(last);
                }
            }
            SheetAction::InsertProduct(title) => {
                let mut row = vec![String::new(); self.columns.len()];
                if let Some(first) = row.first_mut() {
                    *first = title;
                }
                self.rows.push(row);
            }
        }
        self.column_menu.close();
        self.insert_menu.close();
    }

    fn sort_rows(&mut self, ascending: bool) {
        let index = self.active_column;
        self.rows.sort_by(|a, b| {
            let left = a.get(index).map(String::as_str).unwrap_or("");
            let right = b.get(index).map(String::as_str).unwrap_or("");
            if ascending { left.cmp(right) } else { right.cmp(left) }
        });
    }

    fn set_column_hidden(&mut self, hidden: bool) {
        if let Some(column) = self.columns.get_mut(self.active_column) {
            column.hidden = hidden;
        }
        self.column_hidden.store(hidden, Ordering::Relaxed);
    }

    fn show_sheet(&self, ui: &mut egui::Ui) {
        egui::Grid::new("sheet").striped(true).show(ui, |ui| {
            for column in &self.columns {
                if column.hidden {
                    continue;
                }
                ui.label(RichText::new(&column.name).strong());
            }
            ui.end_row();

            for row in &self.rows {
                for (index, cell) in row.iter().enumerate() {
                    if self.columns.get(index).map(|c| c.hidden).unwrap_or(false) {
                        continue;
                    }
                    ui.label(cell);
                }
                ui.end_row();
            }
        });
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label("Column:");
                for index in 0..self.columns.len() {
                    let name = self.columns[index].name.clone();
                    if ui.selectable_label(self.active_column == index, name).clicked() {
                        self.active_column = index;
                    }
                }
                ui.separator();
                if ui
                    .button(format!("{} Column actions", icons::TABLE))
                    .clicked()
                {
                    self.toggle_column_menu();
                }
                if ui.button(format!("{} Insert", icons::PLUS)).clicked() {
                    self.toggle_insert_menu();
                }
            });
        });

        let mut fired = None;
        if self.column_menu.is_open() {
            Window::new("column_actions")
                .title_bar(false)
                .resizable(false)
                .anchor(Align2::LEFT_TOP, [8.0, 40.0])
                .show(ctx, |ui| {
                    ui.set_min_width(220.0);
                    if let Some(action) = self.column_menu.show(ui) {
                        fired = Some(action);
                    }
                });
        }
        if self.insert_menu.is_open() {
            Window::new("insert_product")
                .title_bar(false)
                .resizable(false)
                .anchor(Align2::LEFT_TOP, [260.0, 40.0])
                .show(ctx, |ui| {
                    ui.set_min_width(260.0);
                    if let Some(action) = self.insert_menu.show(ui) {
                        fired = Some(action);
                    }
                });
        }
        if let Some(action) = fired {
            self.apply_action(action);
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.show_sheet(ui);
        });
    }
}
