use fltk::prelude::*;
use std::cell::Cell;
use std::rc::Rc;

// ==========================================
// OFFSET MATH
// ==========================================

/// Translates a 0-based character offset into the byte position the widget
/// toolkit works in. Offsets past the end clamp to the end.
fn char_to_byte(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(idx, _)| idx)
}

/// Builds the per-byte style map for the highlight overlay: 'A' plain,
/// 'B' a match, 'C' the current match.
fn build_style_bytes(
    text: &str,
    matches: &[usize],
    query_len: usize,
    current: Option<usize>,
) -> Vec<u8> {
    let mut style = vec![b'A'; text.len()];

    for (index, &start) in matches.iter().enumerate() {
        let letter = if current == Some(index) { b'C' } else { b'B' };
        let from = char_to_byte(text, start);
        let to = char_to_byte(text, start + query_len);
        style[from..to].fill(letter);
    }

    style
}

// ==========================================
// 1. EDITOR PANE
// ==========================================

/// One fltk editing widget bound to a language slot. The surface talks to
/// it through [`EditorPaneView`]; user input flows back out through the
/// text buffer's modify callback.
pub struct EditorPane {
    pub group: fltk::group::Group,
    pub editor: fltk::text::TextEditor,
    text_buffer: fltk::text::TextBuffer,
    style_buffer: fltk::text::TextBuffer,

    /// Set while the surface is pushing state into the widgets, so the
    /// modify callback does not loop the change back as a local edit.
    syncing: Rc<Cell<bool>>,

    /// Set by the paste action; the next paste event replaces the whole
    /// buffer through the bus instead of inserting at the cursor.
    replace_next_paste: Rc<Cell<bool>>,
}

const FONT_SIZE: i32 = 14;

impl EditorPane {
    pub fn new(
        x: i32,
        y: i32,
        w: i32,
        h: i32,
        language: playground_core::language::Language,
    ) -> Self {
        let group = fltk::group::Group::default()
            .with_pos(x, y)
            .with_size(w, h)
            .with_label(language.title());

        let text_buffer = fltk::text::TextBuffer::default();
        let style_buffer = fltk::text::TextBuffer::default();

        let mut editor = fltk::text::TextEditor::default()
            .with_pos(x, y)
            .with_size(w, h);
        editor.set_buffer(text_buffer.clone());
        editor.set_text_font(fltk::enums::Font::Courier);
        editor.set_text_size(FONT_SIZE);
        editor.set_linenumber_width(40);

        let styles = vec![
            // 'A' plain text
            fltk::text::StyleTableEntry {
                color: fltk::enums::Color::from_rgb(26, 31, 44),
                font: fltk::enums::Font::Courier,
                size: FONT_SIZE,
            },
            // 'B' a search match
            fltk::text::StyleTableEntry {
                color: fltk::enums::Color::from_rgb(178, 105, 0),
                font: fltk::enums::Font::CourierBold,
                size: FONT_SIZE,
            },
            // 'C' the current match
            fltk::text::StyleTableEntry {
                color: fltk::enums::Color::from_rgb(200, 30, 30),
                font: fltk::enums::Font::CourierBold,
                size: FONT_SIZE,
            },
        ];
        editor.set_highlight_data(style_buffer.clone(), styles);

        group.end();

        Self {
            group,
            editor,
            text_buffer,
            style_buffer,
            syncing: Rc::new(Cell::new(false)),
            replace_next_paste: Rc::new(Cell::new(false)),
        }
    }

    /// The view handle to hand to [`editor_surface::slots::SurfaceSlots::bind`].
    #[must_use]
    pub fn view(&self) -> EditorPaneView {
        EditorPaneView {
            editor: self.editor.clone(),
            text_buffer: self.text_buffer.clone(),
            style_buffer: self.style_buffer.clone(),
            syncing: Rc::clone(&self.syncing),
        }
    }

    /// Routes user edits into the bound surface. Call once, after binding.
    pub fn wire_local_edits(
        &mut self,
        surface: std::rc::Rc<std::cell::RefCell<editor_surface::surface::EditableSurface>>,
    ) {
        let syncing = Rc::clone(&self.syncing);
        let buffer = self.text_buffer.clone();

        self.text_buffer
            .add_modify_callback(move |_, inserted, deleted, _, _| {
                if syncing.get() || (inserted == 0 && deleted == 0) {
                    return;
                }
                editor_surface::slots::notify_local_edit(&surface, &buffer.text());
            });
    }

    /// Intercepts the paste gesture triggered by the paste action: instead
    /// of inserting at the cursor, the text goes onto the bus as a
    /// full-replace command targeting this pane's slot. Ordinary Ctrl+V
    /// inside the editor is left alone.
    pub fn wire_paste_command(
        &mut self,
        bus: std::rc::Rc<signal_bus::SignalBus>,
        language: playground_core::language::Language,
    ) {
        let replace_next = Rc::clone(&self.replace_next_paste);

        self.editor.handle(move |_, event| {
            if event == fltk::enums::Event::Paste && replace_next.get() {
                replace_next.set(false);
                bus.publish_paste(signal_bus::PasteCommand {
                    target: language,
                    text: fltk::app::event_text(),
                });
                return true;
            }
            false
        });
    }

    /// Requests clipboard contents through the OS paste gesture; the text
    /// arrives via the handler installed by `wire_paste_command`.
    pub fn request_paste_replace(&self) {
        self.replace_next_paste.set(true);
        fltk::app::paste(&self.editor);
    }
}

/// The [`editor_surface::surface::SurfaceView`] half of an [`EditorPane`].
/// fltk widgets are cheap handles, so this clone shares the pane's state.
pub struct EditorPaneView {
    editor: fltk::text::TextEditor,
    text_buffer: fltk::text::TextBuffer,
    style_buffer: fltk::text::TextBuffer,
    syncing: Rc<Cell<bool>>,
}

impl editor_surface::surface::SurfaceView for EditorPaneView {
    fn set_text(&mut self, text: &str) {
        self.syncing.set(true);
        self.text_buffer.set_text(text);
        self.style_buffer.set_text(&"A".repeat(text.len()));
        self.syncing.set(false);
        self.editor.redraw();
    }

    fn apply_decorations(&mut self, matches: &[usize], query_len: usize, current: Option<usize>) {
        let text = self.text_buffer.text();
        let style = build_style_bytes(&text, matches, query_len, current);

        self.syncing.set(true);
        self.style_buffer
            .set_text(std::str::from_utf8(&style).unwrap_or_default());
        self.syncing.set(false);
        self.editor.redraw();
    }

    fn clear_decorations(&mut self) {
        let len = self.text_buffer.text().len();

        self.syncing.set(true);
        self.style_buffer.set_text(&"A".repeat(len));
        self.syncing.set(false);
        self.editor.redraw();
    }

    fn reveal(&mut self, start: usize, end: usize) {
        let text = self.text_buffer.text();
        let from = char_to_byte(&text, start) as i32;
        let to = char_to_byte(&text, end) as i32;

        self.text_buffer.select(from, to);
        self.editor.set_insert_position(to);
        self.editor.show_insert_position();

        let point = playground_core::search::offset_to_point(&text, start);
        self.editor.scroll(point.row.saturating_sub(3) as i32, 0);
        self.editor.redraw();
    }
}

// ==========================================
// 2. PREVIEW PANE
// ==========================================

/// Hosts the assembled document. The whole content is swapped on every
/// render; the widget never sees incremental patches.
pub struct PreviewPane {
    pub view: fltk::misc::HelpView,
}

impl PreviewPane {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        let mut view = fltk::misc::HelpView::default()
            .with_pos(x, y)
            .with_size(w, h);
        view.set_value("");

        Self { view }
    }

    #[must_use]
    pub fn host(&self) -> PreviewHost {
        PreviewHost {
            view: self.view.clone(),
        }
    }
}

/// The [`playground_core::sandbox::RenderHost`] backed by the preview
/// widget. Display is inert markup rendering; whatever the document's
/// script does (or fails to do) stays inside the host and never surfaces
/// as a core error.
pub struct PreviewHost {
    view: fltk::misc::HelpView,
}

impl playground_core::sandbox::RenderHost for PreviewHost {
    fn replace_content(&mut self, document: &str) {
        self.view.set_value(document);
        self.view.redraw();
    }
}

// ==========================================
// 3. CLIPBOARD
// ==========================================

/// Host clipboard. Writes go straight through; fltk only exposes reads via
/// the paste gesture, so programmatic reads report `AccessDenied` and the
/// caller falls back to [`EditorPane::request_paste_replace`].
pub struct FltkClipboard;

impl playground_core::clipboard::Clipboard for FltkClipboard {
    fn read_text(&self) -> Result<String, playground_core::errors::AccessDenied> {
        Err(playground_core::errors::AccessDenied)
    }

    fn write_text(&self, text: &str) {
        fltk::app::copy(text);
    }
}
