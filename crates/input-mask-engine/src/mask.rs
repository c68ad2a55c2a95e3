//! Compiled mask templates and the mapping between logical and display positions.
//!
//! Two coordinate spaces exist for every field:
//!
//! - **logical**: an index into the buffer of accepted characters
//!   (`0..=buffer.len()`)
//! - **display**: an index into the formatted string, which always has the
//!   same length as the template (`0..=mask.len()`)
//!
//! All indices count `char`s, never bytes.

use regex::Regex;

use crate::validation::{ValidationTable, matches_char};

/// One resolved template character.
#[derive(Debug, Clone)]
pub enum MaskPosition {
    /// Fillable position; `validator` decides which characters it takes.
    Slot { specifier: char, validator: Regex },
    /// Fixed character emitted verbatim.
    Literal(char),
}

impl MaskPosition {
    pub fn is_slot(&self) -> bool {
        matches!(self, MaskPosition::Slot { .. })
    }

    /// Literals never accept input.
    pub fn accepts(&self, ch: char) -> bool {
        match self {
            MaskPosition::Slot { validator, .. } => matches_char(validator, ch),
            MaskPosition::Literal(_) => false,
        }
    }

    /// The template character this position was compiled from.
    pub fn template_char(&self) -> char {
        match self {
            MaskPosition::Slot { specifier, .. } => *specifier,
            MaskPosition::Literal(ch) => *ch,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Mask {
    template: String,
    positions: Vec<MaskPosition>,
    /// Display index of every slot, in order; its length is the capacity.
    slots: Vec<usize>,
}

impl Mask {
    /// Resolve every template character against `table` once.
    pub fn compile(template: &str, table: &ValidationTable) -> Self {
        let positions: Vec<MaskPosition> = template
            .chars()
            .map(|ch| match table.validator(ch) {
                Some(validator) => MaskPosition::Slot {
                    specifier: ch,
                    validator: validator.clone(),
                },
                None => MaskPosition::Literal(ch),
            })
            .collect();

        let slots = positions
            .iter()
            .enumerate()
            .filter(|(_, position)| position.is_slot())
            .map(|(index, _)| index)
            .collect();

        Self {
            template: template.to_string(),
            positions,
            slots,
        }
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn positions(&self) -> &[MaskPosition] {
        &self.positions
    }

    /// Length of the template, and of every formatted string, in chars.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Number of slots, i.e. the most characters the logical buffer can hold.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn is_slot(&self, display_index: usize) -> bool {
        self.positions
            .get(display_index)
            .is_some_and(MaskPosition::is_slot)
    }

    /// Map a logical index to the display index of the slot it would fill.
    ///
    /// That is the first template index where the running slot count exceeds
    /// `logical`, so literals sitting right after a filled slot are skipped
    /// over. Returns `len()` once every slot is behind the caret.
    pub fn to_display(&self, logical: usize) -> usize {
        self.slots.get(logical).copied().unwrap_or(self.len())
    }

    /// Map a display index back to a logical index: the number of slots
    /// strictly before `display`.
    ///
    /// Both sides of a run of literals map to the same logical position.
    pub fn to_logical(&self, display: usize) -> usize {
        self.slots.partition_point(|&slot| slot < display)
    }
}
