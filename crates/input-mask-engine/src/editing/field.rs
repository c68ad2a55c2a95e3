use log::{debug, trace};

use crate::editing::{InputEvent, Key, Modifiers, Patch, Selection};
use crate::mask::Mask;
use crate::validation::MaskConfig;

/// Input event reducer for one masked text field.
///
/// Owns the logical buffer and logical cursor; the display string and
/// display caret are recomputed from them for every patch. A field without a
/// mask is inert: it returns `None` for every event so the host behaves as if
/// no masking were attached.
#[derive(Debug, Clone)]
pub struct MaskedField {
    pub(crate) mask: Option<Mask>,
    placeholder: char,
    buffer: Vec<char>,
    /// Logical cursor. May briefly exceed the buffer while a key event is
    /// processed; clamped before the event returns.
    cursor: usize,
    version: u64,
    /// Bumped for every event, used to invalidate outstanding paste polls.
    pub(crate) generation: u64,
}

impl MaskedField {
    /// Compile `template` with `config`. An empty template yields an inert field.
    pub fn new(template: &str, config: &MaskConfig) -> Self {
        if template.is_empty() {
            debug!("No mask configured, field is inert");
            return Self::inert();
        }

        let mask = Mask::compile(template, &config.table);
        debug!(
            "Masked field created for {:?} (capacity {}, placeholder {:?})",
            template,
            mask.capacity(),
            config.placeholder
        );
        Self::from_mask(mask, config.placeholder)
    }

    pub fn from_mask(mask: Mask, placeholder: char) -> Self {
        Self {
            mask: Some(mask),
            placeholder,
            buffer: Vec::new(),
            cursor: 0,
            version: 0,
            generation: 0,
        }
    }

    /// A field with no mask or no bound model; every event passes through.
    pub fn inert() -> Self {
        Self {
            mask: None,
            placeholder: crate::DEFAULT_PLACEHOLDER,
            buffer: Vec::new(),
            cursor: 0,
            version: 0,
            generation: 0,
        }
    }

    pub fn is_inert(&self) -> bool {
        self.mask.is_none()
    }

    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    pub fn placeholder(&self) -> char {
        self.placeholder
    }

    /// The logical buffer, as exported to the bound model.
    pub fn value(&self) -> String {
        self.buffer.iter().collect()
    }

    /// Logical cursor.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn capacity(&self) -> usize {
        self.mask.as_ref().map_or(0, Mask::capacity)
    }

    /// Every slot is filled.
    pub fn is_complete(&self) -> bool {
        self.mask.is_some() && self.buffer.len() == self.capacity()
    }

    /// Formatted value. Inert fields have nothing to format and return the
    /// raw buffer.
    pub fn display(&self) -> String {
        match &self.mask {
            Some(mask) => mask.format(self.buffer.iter().copied(), self.placeholder),
            None => self.value(),
        }
    }

    /// Display-space position of the logical cursor.
    pub fn display_cursor(&self) -> usize {
        match &self.mask {
            Some(mask) => mask.to_display(self.cursor),
            None => self.cursor,
        }
    }

    /// Accept a value from the bound model. Raw and already formatted strings
    /// are both cleaned against the mask; returns the value actually kept.
    /// Inert fields keep the value untouched.
    pub fn set_value(&mut self, raw: &str) -> String {
        self.generation += 1;
        match &self.mask {
            Some(mask) => {
                self.buffer = mask.unformat(raw).chars().collect();
                self.cursor = self.cursor.min(self.buffer.len());
            }
            None => {
                self.buffer = raw.chars().collect();
                self.cursor = self.buffer.len();
            }
        }
        self.value()
    }

    /// Reduce one input event. `None` asks the host to run its native handling.
    pub fn handle(&mut self, event: InputEvent) -> Option<Patch> {
        if self.is_inert() {
            return None;
        }
        self.generation += 1;
        trace!("Handling {event:?} at logical cursor {}", self.cursor);

        match event {
            InputEvent::Click { selection } => self.on_click(selection),
            InputEvent::KeyDown { key, selection } => self.on_key_down(key, selection),
            InputEvent::KeyPress { ch, modifiers } => self.on_key_press(ch, modifiers),
            InputEvent::Paste { content } => self.apply_paste(&content),
            InputEvent::Blur => self.on_blur(),
        }
    }

    fn on_click(&mut self, selection: Selection) -> Option<Patch> {
        // Leave ranges alone so they can be copied.
        if !selection.is_collapsed() {
            return None;
        }
        let mask = self.mask.as_ref()?;
        self.cursor = mask.to_logical(selection.start);
        Some(self.patch())
    }

    fn on_key_down(&mut self, key: Key, selection: Selection) -> Option<Patch> {
        let mask = self.mask.as_ref()?;
        self.cursor = mask.to_logical(selection.start);

        if !selection.is_collapsed() {
            if !key.is_deletion() {
                self.clamp_cursor();
                return None;
            }
            let len = self.buffer.len();
            let start = self.cursor.min(len);
            let end = mask.to_logical(selection.end).clamp(start, len);
            self.buffer.drain(start..end);
            self.revalidate();
            return Some(self.patch());
        }

        match key {
            Key::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    if self.cursor < self.buffer.len() {
                        self.buffer.remove(self.cursor);
                        self.revalidate();
                    }
                }
            }
            Key::Delete => {
                if self.cursor < self.buffer.len() {
                    self.buffer.remove(self.cursor);
                    self.revalidate();
                }
            }
            Key::ArrowLeft => self.cursor = self.cursor.saturating_sub(1),
            Key::ArrowUp => self.cursor = 0,
            Key::ArrowRight => self.cursor += 1,
            Key::ArrowDown => self.cursor = self.buffer.len(),
            Key::Other(_) => {
                self.clamp_cursor();
                return None;
            }
        }

        Some(self.patch())
    }

    fn on_key_press(&mut self, ch: char, modifiers: Modifiers) -> Option<Patch> {
        if modifiers.any() || ch.is_control() {
            return None;
        }
        let mask = self.mask.as_ref()?;

        let previous = self.buffer.len();
        let mut candidate = self.buffer.clone();
        candidate.insert(self.cursor.min(previous), ch);

        self.buffer = mask.clean(candidate).chars().collect();
        self.cursor = (self.cursor + self.buffer.len()).saturating_sub(previous);
        Some(self.patch())
    }

    pub(crate) fn apply_paste(&mut self, content: &str) -> Option<Patch> {
        let mask = self.mask.as_ref()?;
        self.buffer = mask.unformat(content).chars().collect();
        Some(self.patch())
    }

    fn on_blur(&mut self) -> Option<Patch> {
        if !self.buffer.is_empty() {
            return None;
        }
        self.version += 1;
        Some(Patch {
            display: String::new(),
            cursor: None,
            value: String::new(),
            version: self.version,
        })
    }

    /// Re-run the cleaner after a removal shifted characters into slots of
    /// another class.
    fn revalidate(&mut self) {
        if let Some(mask) = &self.mask {
            let cleaned = mask.clean(self.buffer.iter().copied());
            self.buffer = cleaned.chars().collect();
        }
    }

    fn clamp_cursor(&mut self) {
        self.cursor = self.cursor.min(self.buffer.len());
    }

    /// Clamp the cursor and render the current state.
    fn patch(&mut self) -> Patch {
        self.clamp_cursor();
        self.version += 1;
        Patch {
            display: self.display(),
            cursor: Some(self.display_cursor()),
            value: self.value(),
            version: self.version,
        }
    }
}
