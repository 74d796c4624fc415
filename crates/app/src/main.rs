use fltk::prelude::*;
use playground_core::assemble::DocumentFlavor;
use playground_core::buffer::RenderMode;
use playground_core::clipboard::Clipboard;
use playground_core::language::Language;
use playground_core::sandbox::{CapabilityGrant, SandboxedRenderer};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

// Starter content shown on first launch.
const DEFAULT_MARKUP: &str = "<h1>Hello World!</h1>\n<p>Start editing to see your changes</p>";
const DEFAULT_STYLE: &str =
    "body {\n  font-family: system-ui, sans-serif;\n  padding: 2rem;\n}\n\nh1 {\n  color: #0066cc;\n}";
const DEFAULT_SCRIPT: &str = "// Your JavaScript code here\nconsole.log(\"Script loaded\");\n\n// Example: Add a click event\ndocument.addEventListener(\"click\", function() {\n  console.log(\"Document clicked\");\n});";

const WIN_W: i32 = 1200;
const WIN_H: i32 = 720;
const MENU_H: i32 = 28;
const EDIT_W: i32 = 560;
const SEARCH_H: i32 = 32;

fn main() {
    let app = fltk::app::App::default();
    let mut win = fltk::window::Window::default()
        .with_size(WIN_W, WIN_H)
        .with_label("RunPad");

    // ---- Shared state ----
    let store = Rc::new(RefCell::new(playground_core::buffer::BufferStore::with_contents(
        DEFAULT_MARKUP,
        DEFAULT_STYLE,
        DEFAULT_SCRIPT,
    )));
    let bus = Rc::new(signal_bus::SignalBus::new());
    let slots = Rc::new(RefCell::new(editor_surface::slots::SurfaceSlots::new(
        Rc::clone(&bus),
    )));
    let search = Rc::new(RefCell::new(editor_surface::search::SearchController::new(
        Rc::clone(&bus),
        Language::Markup,
    )));
    let mode = Rc::new(Cell::new(RenderMode::MarkupOnly));
    let active = Rc::new(Cell::new(Language::Markup));
    let last_run: Rc<RefCell<Option<playground_core::buffer::CommittedSnapshot>>> =
        Rc::new(RefCell::new(None));

    // ---- Widgets ----
    let mut menu = fltk::menu::MenuBar::default().with_size(WIN_W, MENU_H);

    let mut tabs = fltk::group::Tabs::default()
        .with_pos(0, MENU_H)
        .with_size(EDIT_W, WIN_H - MENU_H - SEARCH_H - 8);
    let pane_y = MENU_H + 25;
    let pane_h = WIN_H - MENU_H - SEARCH_H - 8 - 25;
    let mut panes: Vec<ui::EditorPane> = Language::ALL
        .iter()
        .map(|language| ui::EditorPane::new(0, pane_y, EDIT_W, pane_h, *language))
        .collect();
    tabs.end();

    let search_y = WIN_H - SEARCH_H - 4;
    let mut search_input = fltk::input::Input::default()
        .with_pos(8, search_y)
        .with_size(220, SEARCH_H - 6)
        .with_label("");
    search_input.set_tooltip("Search the active buffer");
    let mut prev_button = fltk::button::Button::default()
        .with_pos(232, search_y)
        .with_size(32, SEARCH_H - 6)
        .with_label("@<");
    let mut next_button = fltk::button::Button::default()
        .with_pos(268, search_y)
        .with_size(32, SEARCH_H - 6)
        .with_label("@>");
    let mut match_label = fltk::frame::Frame::default()
        .with_pos(304, search_y)
        .with_size(80, SEARCH_H - 6)
        .with_label("");
    let mut run_button = fltk::button::Button::default()
        .with_pos(EDIT_W - 110, search_y)
        .with_size(100, SEARCH_H - 6)
        .with_label("Run");
    let mut status = fltk::frame::Frame::default()
        .with_pos(EDIT_W + 8, search_y)
        .with_size(WIN_W - EDIT_W - 16, SEARCH_H - 6)
        .with_label("");
    status.set_label_size(12);

    let preview = ui::PreviewPane::new(
        EDIT_W + 8,
        MENU_H,
        WIN_W - EDIT_W - 16,
        WIN_H - MENU_H - SEARCH_H - 8,
    );
    let renderer = Rc::new(RefCell::new(SandboxedRenderer::new(
        preview.host(),
        CapabilityGrant::ScriptsOnly,
    )));

    win.resizable(&tabs);
    win.end();

    // ---- Local edit propagation: surface -> store -> search -> preview ----
    let edit_store = Rc::clone(&store);
    let edit_search = Rc::clone(&search);
    let edit_mode = Rc::clone(&mode);
    let edit_renderer = Rc::clone(&renderer);
    let on_local_edit: editor_surface::surface::LocalEditHandler =
        Rc::new(move |language, text| {
            edit_store.borrow_mut().set_text(language, text);

            if edit_search.borrow().target() == language {
                edit_search.borrow_mut().refresh(text);
            }

            // Markup-only mode mirrors the live markup buffer; full mode
            // waits for the run action.
            if edit_mode.get() == RenderMode::MarkupOnly && language == Language::Markup {
                edit_renderer.borrow_mut().render_live_markup(text);
            }
        });

    for (pane, language) in panes.iter_mut().zip(Language::ALL) {
        let surface = slots.borrow_mut().bind(
            language,
            store.borrow().text(language),
            Box::new(pane.view()),
            Rc::clone(&on_local_edit),
        );
        pane.wire_local_edits(surface);
        pane.wire_paste_command(Rc::clone(&bus), language);
    }
    let panes = Rc::new(panes);

    // ---- Active buffer selection ----
    let tab_active = Rc::clone(&active);
    let tab_search = Rc::clone(&search);
    let tab_store = Rc::clone(&store);
    tabs.set_callback(move |tabs| {
        let Some(group) = tabs.value() else { return };
        // Falls back to markup for anything outside the closed set.
        let language =
            Language::from_selector(&group.label()).unwrap_or(Language::Markup);

        tab_active.set(language);
        tab_search
            .borrow_mut()
            .retarget(language, tab_store.borrow().text(language));
    });

    // ---- Search bar ----
    let refresh_match_label = {
        let search = Rc::clone(&search);
        let mut label = match_label.clone();
        move || {
            let search = search.borrow();
            let state = search.state();
            let text = match state.current {
                Some(index) => format!("{}/{}", index + 1, state.matches.len()),
                None => String::new(),
            };
            label.set_label(&text);
        }
    };

    search_input.set_trigger(fltk::enums::CallbackTrigger::Changed);
    let input_search = Rc::clone(&search);
    let input_store = Rc::clone(&store);
    let input_active = Rc::clone(&active);
    let mut input_refresh = refresh_match_label.clone();
    search_input.set_callback(move |input| {
        let language = input_active.get();
        input_search
            .borrow_mut()
            .set_query(input_store.borrow().text(language), &input.value());
        input_refresh();
    });

    let next_search = Rc::clone(&search);
    let mut next_refresh = refresh_match_label.clone();
    next_button.set_callback(move |_| {
        next_search.borrow_mut().next();
        next_refresh();
    });

    let prev_search = Rc::clone(&search);
    let mut prev_refresh = refresh_match_label;
    prev_button.set_callback(move |_| {
        prev_search.borrow_mut().previous();
        prev_refresh();
    });

    // ---- Run ----
    let run_store = Rc::clone(&store);
    let run_renderer = Rc::clone(&renderer);
    let run_mode = Rc::clone(&mode);
    let run_last = Rc::clone(&last_run);
    let run = move || {
        let snapshot = run_store.borrow_mut().commit();
        run_renderer
            .borrow_mut()
            .render_snapshot(&snapshot, run_mode.get(), DocumentFlavor::Preview);
        *run_last.borrow_mut() = Some(snapshot);
    };

    let run_cb = run.clone();
    run_button.set_callback(move |_| run_cb());

    // ---- Menu ----
    let run_cb = run.clone();
    menu.add(
        "Run/Run",
        fltk::enums::Shortcut::Ctrl | 'r',
        fltk::menu::MenuFlag::Normal,
        move |_| run_cb(),
    );

    let copy_store = Rc::clone(&store);
    let copy_mode = Rc::clone(&mode);
    let mut copy_status = status.clone();
    menu.add(
        "Edit/Copy Code",
        fltk::enums::Shortcut::None,
        fltk::menu::MenuFlag::Normal,
        move |_| {
            let store = copy_store.borrow();
            let document = playground_core::assemble::assemble(
                store.text(Language::Markup),
                store.text(Language::Style),
                store.text(Language::Script),
                copy_mode.get(),
            );
            ui::FltkClipboard.write_text(&document);
            copy_status.set_label("Code copied to clipboard");
        },
    );

    let paste_panes = Rc::clone(&panes);
    let paste_active = Rc::clone(&active);
    let paste_bus = Rc::clone(&bus);
    let mut paste_status = status.clone();
    menu.add(
        "Edit/Paste Into Active",
        fltk::enums::Shortcut::None,
        fltk::menu::MenuFlag::Normal,
        move |_| {
            let language = paste_active.get();
            match ui::FltkClipboard.read_text() {
                Ok(text) => {
                    paste_bus.publish_paste(signal_bus::PasteCommand {
                        target: language,
                        text,
                    });
                }
                Err(playground_core::errors::AccessDenied) => {
                    // Recoverable: fall back to the OS paste gesture; the
                    // pane publishes the command once the text arrives.
                    paste_status.set_label("Clipboard read denied; using paste gesture");
                    paste_panes[language.slot()].request_paste_replace();
                }
            }
        },
    );

    let open_bus = Rc::clone(&bus);
    let open_active = Rc::clone(&active);
    let mut open_status = status.clone();
    menu.add(
        "File/Open Into Active...",
        fltk::enums::Shortcut::Ctrl | 'o',
        fltk::menu::MenuFlag::Normal,
        move |_| {
            let mut dialog =
                fltk::dialog::FileDialog::new(fltk::dialog::FileDialogType::BrowseFile);
            dialog.set_filter("*.{html,htm,css,js,txt}");
            dialog.show();
            let path = dialog.filename();
            if path.as_os_str().is_empty() {
                return;
            }

            match io::read_source(&path) {
                // However the text was obtained, it enters the core as a
                // paste command.
                Ok(text) => open_bus.publish_paste(signal_bus::PasteCommand {
                    target: open_active.get(),
                    text,
                }),
                Err(e) => open_status.set_label(&format!("Open failed: {e}")),
            }
        },
    );

    let export_store = Rc::clone(&store);
    let export_mode = Rc::clone(&mode);
    let mut export_status = status.clone();
    menu.add(
        "File/Export HTML...",
        fltk::enums::Shortcut::None,
        fltk::menu::MenuFlag::Normal,
        move |_| {
            let mut dialog =
                fltk::dialog::FileDialog::new(fltk::dialog::FileDialogType::BrowseSaveFile);
            dialog.set_filter("*.html");
            dialog.set_preset_file(&io::export_file_name(None));
            dialog.show();
            let path = dialog.filename();
            if path.as_os_str().is_empty() {
                return;
            }

            let store = export_store.borrow();
            let document = playground_core::assemble::assemble(
                store.text(Language::Markup),
                store.text(Language::Style),
                store.text(Language::Script),
                export_mode.get(),
            );
            match io::write_atomic(&path, &document) {
                Ok(()) => export_status.set_label("HTML file saved"),
                Err(e) => export_status.set_label(&format!("Export failed: {e}")),
            }
        },
    );

    let result_store = Rc::clone(&store);
    let result_mode = Rc::clone(&mode);
    menu.add(
        "View/Full Result...",
        fltk::enums::Shortcut::None,
        fltk::menu::MenuFlag::Normal,
        move |_| {
            show_full_result(&result_store.borrow(), result_mode.get());
        },
    );

    let mode_only_mode = Rc::clone(&mode);
    let mode_only_store = Rc::clone(&store);
    let mode_only_renderer = Rc::clone(&renderer);
    menu.add(
        "Mode/HTML Only",
        fltk::enums::Shortcut::None,
        fltk::menu::MenuFlag::Radio,
        move |_| {
            mode_only_mode.set(RenderMode::MarkupOnly);
            mode_only_renderer
                .borrow_mut()
                .render_live_markup(mode_only_store.borrow().text(Language::Markup));
        },
    );
    let mode_full_mode = Rc::clone(&mode);
    let mode_full_last = Rc::clone(&last_run);
    let mode_full_renderer = Rc::clone(&renderer);
    menu.add(
        "Mode/HTML + CSS + JavaScript",
        fltk::enums::Shortcut::None,
        fltk::menu::MenuFlag::Radio,
        move |_| {
            mode_full_mode.set(RenderMode::Full);
            // Full mode renders the committed snapshot; a run is required
            // before anything appears.
            if let Some(snapshot) = mode_full_last.borrow().as_ref() {
                mode_full_renderer.borrow_mut().render_snapshot(
                    snapshot,
                    RenderMode::Full,
                    DocumentFlavor::Preview,
                );
            }
        },
    );
    if let Some(mut item) = menu.find_item("Mode/HTML Only") {
        item.set();
    }

    // Initial live mirror of the starter markup.
    renderer
        .borrow_mut()
        .render_live_markup(store.borrow().text(Language::Markup));

    win.show();
    app.run().unwrap();
}

/// Opens the standalone final-result window with the widened capability
/// grant. Links open outside the sandbox; same-origin access is allowed
/// for this deliberate, user-invoked view only.
fn show_full_result(store: &playground_core::buffer::BufferStore, mode: RenderMode) {
    let mut win = fltk::window::Window::default()
        .with_size(900, 700)
        .with_label("Full Result");
    let pane = ui::PreviewPane::new(0, 0, 900, 700);
    win.resizable(&pane.view);
    win.end();

    let mut renderer = SandboxedRenderer::new(pane.host(), CapabilityGrant::FullInteractive);
    let document = playground_core::assemble::assemble_flavor(
        store.text(Language::Markup),
        store.text(Language::Style),
        store.text(Language::Script),
        mode,
        DocumentFlavor::FinalResult,
    );
    renderer.render(&document);

    win.show();
}
