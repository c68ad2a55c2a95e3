//! UniFFI bindings for input-mask mobile hosts
//!
//! The host keeps its native text field and forwards raw events here; every
//! call returns the patch to render, or `None` when the native behaviour
//! should run.

use input_mask_engine::{
    InputEvent, Key, MaskConfig, MaskedField, Modifiers, PASTE_POLL_INTERVAL, PasteStatus,
    PasteTicket, Patch, Selection,
};
use std::sync::Mutex;

uniffi::setup_scaffolding!();

// ============ Errors ============

/// Errors that can cross the FFI boundary
/// Note: Field is named `reason` not `message` to avoid conflict with Throwable.message in Kotlin
#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FfiError {
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },
}

// ============ Config ============

/// A slot specifier to register on top of the built-in `A`, `a` and `9`.
#[derive(uniffi::Record)]
pub struct CharValidationDto {
    pub specifier: String,
    pub pattern: String,
}

fn single_char(value: &str, what: &str) -> Result<char, FfiError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) => Ok(ch),
        _ => Err(FfiError::InvalidConfig {
            reason: format!("{what} must be a single character, got {value:?}"),
        }),
    }
}

fn build_config(
    placeholder: Option<String>,
    validations: Vec<CharValidationDto>,
) -> Result<MaskConfig, FfiError> {
    let mut config = MaskConfig::default();
    if let Some(placeholder) = placeholder {
        config.set_placeholder(single_char(&placeholder, "placeholder")?);
    }
    for validation in validations {
        let specifier = single_char(&validation.specifier, "specifier")?;
        config
            .add_char_validation(specifier, &validation.pattern)
            .map_err(|e| FfiError::InvalidConfig {
                reason: e.to_string(),
            })?;
    }
    Ok(config)
}

// ============ Field Handle ============

struct FieldState {
    field: MaskedField,
    /// Outstanding paste for hosts that poll for pasted content.
    paste: Option<PasteTicket>,
}

/// A handle to one masked text field.
#[derive(uniffi::Object)]
pub struct MaskedFieldHandle {
    inner: Mutex<FieldState>,
}

impl MaskedFieldHandle {
    fn with_state<T>(&self, f: impl FnOnce(&mut FieldState) -> T) -> T {
        // Recover from poisoned mutex (another thread panicked while holding lock)
        let mut state = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut state)
    }

    fn with_field<T>(&self, f: impl FnOnce(&mut MaskedField) -> T) -> T {
        self.with_state(|state| f(&mut state.field))
    }

    fn handle(&self, event: InputEvent) -> Option<PatchDto> {
        self.with_field(|field| field.handle(event))
            .map(PatchDto::from_engine)
    }
}

#[uniffi::export]
impl MaskedFieldHandle {
    /// Create a field for `mask`. An empty mask gives an inert field.
    #[uniffi::constructor]
    pub fn new(
        mask: String,
        placeholder: Option<String>,
        validations: Vec<CharValidationDto>,
    ) -> Result<Self, FfiError> {
        let config = build_config(placeholder, validations)?;
        log::debug!("FFI field created for {mask:?}");
        Ok(Self {
            inner: Mutex::new(FieldState {
                field: MaskedField::new(&mask, &config),
                paste: None,
            }),
        })
    }

    pub fn click(&self, selection_start: u32, selection_end: u32) -> Option<PatchDto> {
        self.handle(InputEvent::Click {
            selection: selection(selection_start, selection_end),
        })
    }

    /// `key_code` is a DOM-style key code (8 backspace, 46 delete, 37-40 arrows).
    pub fn key_down(
        &self,
        key_code: u32,
        selection_start: u32,
        selection_end: u32,
    ) -> Option<PatchDto> {
        self.handle(InputEvent::KeyDown {
            key: Key::from_code(key_code),
            selection: selection(selection_start, selection_end),
        })
    }

    /// `text` must hold exactly one character; anything else passes through.
    pub fn key_press(&self, text: String, alt: bool, ctrl: bool) -> Option<PatchDto> {
        let ch = single_char(&text, "key press").ok()?;
        self.handle(InputEvent::KeyPress {
            ch,
            modifiers: Modifiers { alt, ctrl },
        })
    }

    pub fn paste(&self, content: String) -> Option<PatchDto> {
        self.handle(InputEvent::Paste { content })
    }

    /// Start waiting for pasted content on hosts without a paste-content
    /// event. `prior` is the raw field content when the paste started. Poll
    /// [`MaskedFieldHandle::complete_paste`] every [`paste_poll_interval_ms`]
    /// until it stops returning `Pending`. Returns `false` for inert fields.
    pub fn begin_paste(&self, prior: String) -> bool {
        self.with_state(|state| {
            state.paste = state.field.begin_paste(&prior);
            state.paste.is_some()
        })
    }

    pub fn complete_paste(&self, current: String) -> PastePollDto {
        self.with_state(|state| {
            let Some(ticket) = state.paste.as_mut() else {
                return PastePollDto::Stale;
            };
            match state.field.complete_paste(ticket, &current) {
                PasteStatus::Pending => PastePollDto::Pending,
                PasteStatus::Stale => {
                    state.paste = None;
                    PastePollDto::Stale
                }
                PasteStatus::Applied(patch) => {
                    state.paste = None;
                    PastePollDto::Applied {
                        patch: PatchDto::from_engine(patch),
                    }
                }
            }
        })
    }

    pub fn blur(&self) -> Option<PatchDto> {
        self.handle(InputEvent::Blur)
    }

    /// Accept a model value; returns the value actually kept.
    pub fn set_value(&self, value: String) -> String {
        self.with_field(|field| field.set_value(&value))
    }

    pub fn value(&self) -> String {
        self.with_field(|field| field.value())
    }

    pub fn display(&self) -> String {
        self.with_field(|field| field.display())
    }

    pub fn is_complete(&self) -> bool {
        self.with_field(|field| field.is_complete())
    }
}

fn selection(start: u32, end: u32) -> Selection {
    Selection::new(start as usize, end as usize)
}

// ============ DTOs ============

/// What the host applies to its text field.
#[derive(Debug, PartialEq, uniffi::Record)]
pub struct PatchDto {
    /// Formatted value to render
    pub display: String,
    /// Caret position in the formatted value, if it should move
    pub cursor: Option<u32>,
    /// Unformatted value for the bound model
    pub value: String,
    pub version: u64,
}

impl PatchDto {
    fn from_engine(patch: Patch) -> Self {
        Self {
            display: patch.display,
            cursor: patch
                .cursor
                .map(|cursor| u32::try_from(cursor).unwrap_or(u32::MAX)),
            value: patch.value,
            version: patch.version,
        }
    }
}

/// Result of one paste poll.
#[derive(Debug, PartialEq, uniffi::Enum)]
pub enum PastePollDto {
    /// Content unchanged, poll again
    Pending,
    /// Superseded by a newer event or timed out, stop polling
    Stale,
    Applied { patch: PatchDto },
}

// ============ Standalone Functions ============

#[uniffi::export]
pub fn paste_poll_interval_ms() -> u64 {
    u64::try_from(PASTE_POLL_INTERVAL.as_millis()).unwrap_or(u64::MAX)
}

/// Format `value` with `mask` using the default placeholder and specifiers.
///
/// The value is cleaned first, so formatted input is accepted too.
#[uniffi::export]
pub fn format_value(mask: String, value: String) -> String {
    let mut field = MaskedField::new(&mask, &MaskConfig::default());
    field.set_value(&value);
    field.display()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handle(mask: &str) -> MaskedFieldHandle {
        MaskedFieldHandle::new(mask.to_string(), None, Vec::new()).unwrap()
    }

    #[test]
    fn test_typing_through_handle() {
        let field = handle("99/99");
        field.key_press("1".to_string(), false, false);
        let patch = field.key_press("2".to_string(), false, false).unwrap();

        assert_eq!(patch.display, "12/__");
        assert_eq!(patch.cursor, Some(3));
        assert_eq!(patch.value, "12");
        assert_eq!(field.value(), "12");
    }

    #[test]
    fn test_key_codes_are_translated() {
        let field = handle("99/99");
        field.set_value("123".to_string());

        let patch = field.key_down(8, 4, 4).unwrap();
        assert_eq!(patch.value, "12");

        assert_eq!(field.key_down(65, 0, 0), None);
    }

    #[test]
    fn test_multi_char_key_press_passes_through() {
        let field = handle("99");
        assert_eq!(field.key_press("12".to_string(), false, false), None);
        assert_eq!(field.value(), "");
    }

    #[test]
    fn test_custom_placeholder_and_specifier() {
        let field = MaskedFieldHandle::new(
            "HH-HH".to_string(),
            Some("·".to_string()),
            vec![CharValidationDto {
                specifier: "H".to_string(),
                pattern: "[0-9a-f]".to_string(),
            }],
        )
        .unwrap();

        let patch = field.paste("zz0f".to_string()).unwrap();
        assert_eq!(patch.display, "0f-··");
    }

    #[test]
    fn test_invalid_config_is_reported() {
        let result = MaskedFieldHandle::new("99".to_string(), Some("ab".to_string()), Vec::new());
        assert!(matches!(result, Err(FfiError::InvalidConfig { .. })));

        let result = MaskedFieldHandle::new(
            "99".to_string(),
            None,
            vec![CharValidationDto {
                specifier: "X".to_string(),
                pattern: "(".to_string(),
            }],
        );
        assert!(matches!(result, Err(FfiError::InvalidConfig { .. })));
    }

    #[test]
    fn test_polled_paste() {
        let field = handle("+1 (999) 999-9999");
        assert!(field.begin_paste("+1 (___) ___-____".to_string()));

        assert_eq!(
            field.complete_paste("+1 (___) ___-____".to_string()),
            PastePollDto::Pending
        );
        match field.complete_paste("+1 (5551234567___) ___-____".to_string()) {
            PastePollDto::Applied { patch } => {
                assert_eq!(patch.value, "5551234567");
                assert_eq!(patch.display, "+1 (555) 123-4567");
            }
            other => panic!("expected paste to apply, got {other:?}"),
        }

        // The ticket is spent.
        assert_eq!(
            field.complete_paste("+1 (999) ___-____".to_string()),
            PastePollDto::Stale
        );
        assert_eq!(paste_poll_interval_ms(), 10);
    }

    #[test]
    fn test_typing_during_paste_makes_it_stale() {
        let field = handle("9999");
        assert!(field.begin_paste(String::new()));
        field.key_press("7".to_string(), false, false);

        assert_eq!(field.complete_paste("12".to_string()), PastePollDto::Stale);
        assert_eq!(field.value(), "7");
    }

    #[test]
    fn test_inert_field_does_not_poll() {
        let field = handle("");
        assert!(!field.begin_paste("x".to_string()));
        assert_eq!(field.complete_paste("xy".to_string()), PastePollDto::Stale);
    }

    #[test]
    fn test_blur_empty() {
        let field = handle("99");
        let patch = field.blur().unwrap();
        assert_eq!(patch.display, "");
        assert_eq!(patch.cursor, None);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(
            format_value("(99) 9-999".to_string(), "123456".to_string()),
            "(12) 3-456"
        );
        assert_eq!(
            format_value("(99) 9-999".to_string(), "(12) 3-4__".to_string()),
            "(12) 3-4__"
        );
    }
}
