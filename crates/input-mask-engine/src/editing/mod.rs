/*!
 * # Field Editing
 *
 * A masked field keeps two pieces of state, the **logical buffer** of
 * accepted characters and a **logical cursor** into it. Everything the user
 * sees is derived from those on every event.
 *
 * ## Event Loop
 *
 * 1. The host translates a native event into an [`InputEvent`], passing
 *    selection offsets in display space.
 * 2. [`MaskedField::handle`] maps the selection through the inverse cursor
 *    map, mutates the buffer and cursor, and clamps the cursor to the buffer.
 * 3. The returned [`Patch`] carries the formatted display string, the
 *    display-space caret and the value to export to the bound model.
 * 4. `None` means the reducer does not own this event and the host should
 *    run its native behaviour (copying a selection, tab navigation, ...).
 *
 * ## Paste
 *
 * Pasted text is only visible once the host has updated the raw field
 * content. Hosts that get the content directly send [`InputEvent::Paste`];
 * hosts that must poll use [`MaskedField::begin_paste`] and
 * [`MaskedField::complete_paste`], which refuse to apply a poll that has been
 * overtaken by a later event.
 *
 * ## Usage Pattern
 *
 * ```rust
 * use input_mask_engine::{InputEvent, MaskConfig, MaskedField, Selection};
 *
 * let mut field = MaskedField::new("(99) 9-999", &MaskConfig::default());
 * field.handle(InputEvent::Click { selection: Selection::collapsed(0) });
 *
 * let mut last = None;
 * for ch in "123456".chars() {
 *     last = field.handle(InputEvent::typed(ch));
 * }
 *
 * let patch = last.unwrap();
 * assert_eq!(patch.display, "(12) 3-456");
 * assert_eq!(patch.value, "123456");
 * assert_eq!(patch.cursor, Some(10));
 * ```
 */

pub mod event;
pub mod field;
pub mod patch;
pub mod paste;

pub use event::{InputEvent, Key, Modifiers, Selection};
pub use field::MaskedField;
pub use patch::Patch;
pub use paste::{MAX_PASTE_POLLS, PASTE_POLL_INTERVAL, PasteStatus, PasteTicket};
