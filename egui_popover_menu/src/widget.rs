//! egui rendering for the popover menu.

use std::time::Instant;

use egui::{Color32, Key, RichText, ScrollArea, TextEdit, Ui};

use crate::state::PopoverMenu;

impl<A: Clone + 'static> PopoverMenu<A> {
    /// Render the menu into `ui` while open.
    ///
    /// Returns the action of a row that fired this frame. Arming a
    /// confirmation row returns `None`. The menu never closes itself on a
    /// fired action; that stays a host decision.
    pub fn show(&mut self, ui: &mut Ui) -> Option<A> {
        if !self.is_open() {
            return None;
        }
        let now = Instant::now();
        self.poll(now);

        // Search input
        let mut query = self.query().to_string();
        let text_res = ui.add(TextEdit::singleline(&mut query).hint_text("Search..."));
        if text_res.changed() {
            self.set_query(&query, now);
            self.select_first();
            // The local policy re-renders synchronously on each keystroke.
            self.poll(now);
        }
        if query.is_empty() && !ui.memory(|m| m.has_focus(text_res.id)) {
            text_res.request_focus();
        }

        // Handle Escape
        if ui.input(|i| i.key_pressed(Key::Escape)) {
            self.close();
            return None;
        }

        // Keyboard Navigation
        if ui.input(|i| i.key_pressed(Key::ArrowDown)) {
            self.select_next();
        }
        if ui.input(|i| i.key_pressed(Key::ArrowUp)) {
            self.select_previous();
        }
        let mut clicked: Option<usize> = None;
        if ui.input(|i| i.key_pressed(Key::Enter)) && self.visible_row_count() > 0 {
            clicked = Some(self.selected_index());
        }

        ui.separator();

        ScrollArea::vertical().max_height(300.0).show(ui, |ui| {
            if self.visible_row_count() == 0 {
                ui.label("No results");
            }

            for index in 0..self.row_count() {
                if self.is_row_hidden(index) {
                    continue;
                }
                if self.render_row(ui, index) {
                    clicked = Some(index);
                }
            }
        });

        // Single resolution point for every row activation.
        let fired = clicked.and_then(|index| self.row_clicked(index));

        if let Some(wakeup) = self.next_wakeup(now) {
            ui.ctx()
                .request_repaint_after(wakeup.saturating_duration_since(now));
        }

        fired
    }

    /// Render one row; returns whether it was clicked.
    fn render_row(&self, ui: &mut Ui, index: usize) -> bool {
        let Some(item) = self.items().get(index) else {
            return false;
        };
        let is_selected = index == self.selected_index();
        let armed = self.is_row_armed(index);

        let response = if let Some(content) = &item.content {
            ui.scope_builder(
                egui::UiBuilder::new().sense(egui::Sense::click()),
                |ui| content(ui),
            )
            .response
        } else {
            let text = match &item.icon {
                Some(icon) => format!("{} {}", icon, item.label),
                None => item.label.clone(),
            };
            let rich = if armed {
                // Armed rows keep their label; only the styling changes.
                RichText::new(text).strong().color(Color32::RED)
            } else if is_selected {
                RichText::new(text)
                    .strong()
                    .background_color(ui.visuals().selection.bg_fill)
                    .color(ui.visuals().selection.stroke.color)
            } else {
                RichText::new(text)
            };
            ui.selectable_label(is_selected, rich)
        };

        if is_selected {
            response.scroll_to_me(Some(egui::Align::Center));
        }
        response.clicked()
    }
}

#[cfg(test)]
mod tests {
    use crate::state::PopoverMenu;
    use crate::types::PopoverItem;
    use egui_kittest::Harness;
    use egui_kittest::kittest::Queryable;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Instant;

    fn column_items() -> Vec<PopoverItem<&'static str>> {
        vec![
            PopoverItem::new("Rename", "rename"),
            PopoverItem::new("Copy", "copy"),
            PopoverItem::new("Delete", "delete").with_confirmation(),
        ]
    }

    fn open_menu(items: Vec<PopoverItem<&'static str>>) -> Rc<RefCell<PopoverMenu<&'static str>>> {
        let mut menu = PopoverMenu::local(items);
        menu.open();
        Rc::new(RefCell::new(menu))
    }

    #[test]
    fn rows_render_their_labels() {
        let menu = open_menu(column_items());
        let m = menu.clone();
        let harness = Harness::builder()
            .with_size(egui::vec2(300.0, 400.0))
            .build_ui(move |ui| {
                m.borrow_mut().show(ui);
            });
        assert!(harness.query_by_label("Rename").is_some());
        assert!(harness.query_by_label("Copy").is_some());
        assert!(harness.query_by_label("Delete").is_some());
    }

    #[test]
    fn closed_menu_renders_nothing() {
        let menu = Rc::new(RefCell::new(PopoverMenu::local(column_items())));
        let m = menu.clone();
        let harness = Harness::builder()
            .with_size(egui::vec2(300.0, 400.0))
            .build_ui(move |ui| {
                m.borrow_mut().show(ui);
            });
        assert!(harness.query_by_label("Rename").is_none());
    }

    #[test]
    fn query_filters_the_rendered_rows() {
        let menu = open_menu(column_items());
        menu.borrow_mut().set_query("del", Instant::now());
        let m = menu.clone();
        let mut harness = Harness::builder()
            .with_size(egui::vec2(300.0, 400.0))
            .build_ui(move |ui| {
                m.borrow_mut().show(ui);
            });
        harness.run_steps(2);
        assert!(harness.query_by_label("Delete").is_some());
        assert!(harness.query_by_label("Rename").is_none());
        assert!(harness.query_by_label("Copy").is_none());
    }

    #[test]
    fn unmatched_query_shows_the_empty_state() {
        let menu = open_menu(column_items());
        menu.borrow_mut().set_query("zzz", Instant::now());
        let m = menu.clone();
        let mut harness = Harness::builder()
            .with_size(egui::vec2(300.0, 400.0))
            .build_ui(move |ui| {
                m.borrow_mut().show(ui);
            });
        harness.run_steps(2);
        assert!(harness.query_by_label("No results").is_some());
        assert!(harness.query_by_label("Rename").is_none());
    }

    #[test]
    fn hidden_rows_are_not_rendered() {
        let menu = open_menu(vec![
            PopoverItem::new("Sort A to Z", "sort"),
            PopoverItem::new("Show column", "show").hide_when(|| true),
        ]);
        let m = menu.clone();
        let harness = Harness::builder()
            .with_size(egui::vec2(300.0, 400.0))
            .build_ui(move |ui| {
                m.borrow_mut().show(ui);
            });
        assert!(harness.query_by_label("Sort A to Z").is_some());
        assert!(harness.query_by_label("Show column").is_none());
    }

    #[test]
    fn clicking_a_plain_row_fires_its_action() {
        let menu = open_menu(column_items());
        let results: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
        let m = menu.clone();
        let r = results.clone();

        let mut harness = Harness::builder()
            .with_size(egui::vec2(300.0, 400.0))
            .build_ui(move |ui| {
                if let Some(action) = m.borrow_mut().show(ui) {
                    r.borrow_mut().push(action);
                }
            });

        harness.get_by_label("Copy").click();
        harness.run_steps(2);
        assert_eq!(*results.borrow(), vec!["copy"]);
    }

    #[test]
    fn confirmation_row_takes_two_clicks_and_fires_once() {
        let menu = open_menu(column_items());
        let results: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));
        let m = menu.clone();
        let r = results.clone();

        let mut harness = Harness::builder()
            .with_size(egui::vec2(300.0, 400.0))
            .build_ui(move |ui| {
                if let Some(action) = m.borrow_mut().show(ui) {
                    r.borrow_mut().push(action);
                }
            });

        harness.get_by_label("Delete").click();
        harness.run_steps(2);
        assert!(results.borrow().is_empty());
        assert!(menu.borrow().is_row_armed(2));

        harness.get_by_label("Delete").click();
        harness.run_steps(2);
        assert_eq!(*results.borrow(), vec!["delete"]);
    }
}
