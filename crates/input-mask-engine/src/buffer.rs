//! Buffer cleaning and formatting.
//!
//! The logical buffer is always a gap-free prefix of the slots: the n-th
//! accepted character belongs to the n-th slot. Cleaning enforces that and
//! formatting expands it into the display string.

use crate::mask::{Mask, MaskPosition};

impl Mask {
    /// Filter `candidate` down to the characters each successive slot accepts,
    /// stopping at the mask's capacity.
    ///
    /// Rejected characters are dropped silently. Literals are treated as
    /// input like any other character; use [`Mask::unformat`] for values that
    /// may already be formatted.
    pub fn clean<I>(&self, candidate: I) -> String
    where
        I: IntoIterator<Item = char>,
    {
        self.clean_to(candidate, self.capacity())
    }

    /// [`Mask::clean`] with an explicit limit. A limit above the capacity has
    /// no effect: there is no slot to fill past the last one.
    pub fn clean_to<I>(&self, candidate: I, capacity: usize) -> String
    where
        I: IntoIterator<Item = char>,
    {
        let mut cleaned = String::new();
        let mut accepted = 0;
        if capacity == 0 {
            return cleaned;
        }

        for ch in candidate {
            let slot = self.to_display(accepted);
            if self
                .positions()
                .get(slot)
                .is_some_and(|position| position.accepts(ch))
            {
                cleaned.push(ch);
                accepted += 1;
            }
            if accepted >= capacity {
                break;
            }
        }

        cleaned
    }

    /// Clean a value that may already be formatted.
    ///
    /// While the candidate agrees with the template, characters equal to the
    /// literal at their own position are skipped before cleaning. Without
    /// this a literal that a later slot accepts, such as the `1` in
    /// `+1 (999) 999-9999`, would be taken as input. The first literal
    /// position that does not match ends the alignment and the rest is
    /// cleaned as raw input, so unformatted values are unaffected.
    pub fn unformat(&self, candidate: &str) -> String {
        let positions = self.positions();
        let mut aligned = true;
        let stripped = candidate
            .chars()
            .enumerate()
            .filter(|&(index, ch)| {
                if !aligned {
                    return true;
                }
                match positions.get(index) {
                    Some(MaskPosition::Literal(literal)) if *literal == ch => false,
                    Some(MaskPosition::Slot { .. }) => true,
                    Some(MaskPosition::Literal(_)) | None => {
                        aligned = false;
                        true
                    }
                }
            })
            .map(|(_, ch)| ch);

        self.clean(stripped)
    }

    /// Expand `buffer` over the template. Slots take buffer characters in
    /// order, then `placeholder`; literals pass through. The result is always
    /// `len()` chars long.
    pub fn format<I>(&self, buffer: I, placeholder: char) -> String
    where
        I: IntoIterator<Item = char>,
    {
        let mut buffer = buffer.into_iter();
        self.positions()
            .iter()
            .map(|position| match position {
                MaskPosition::Slot { .. } => buffer.next().unwrap_or(placeholder),
                MaskPosition::Literal(ch) => *ch,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::mask::Mask;
    use crate::validation::ValidationTable;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn mask(template: &str) -> Mask {
        Mask::compile(template, &ValidationTable::default())
    }

    #[test]
    fn test_format_phone_number() {
        let mask = mask("(99) 9-999");
        assert_eq!(mask.format("123456".chars(), '_'), "(12) 3-456");
    }

    #[rstest]
    #[case("", "(__) _-___")]
    #[case("1", "(1_) _-___")]
    #[case("123", "(12) 3-___")]
    fn test_format_fills_placeholders(#[case] buffer: &str, #[case] expected: &str) {
        assert_eq!(mask("(99) 9-999").format(buffer.chars(), '_'), expected);
    }

    #[test]
    fn test_format_uses_given_placeholder() {
        assert_eq!(mask("99/99").format("1".chars(), '#'), "1#/##");
    }

    #[test]
    fn test_format_ignores_buffer_overflow() {
        assert_eq!(mask("9-9").format("12345".chars(), '_'), "1-2");
    }

    #[test]
    fn test_format_length_matches_template() {
        let mask = mask("AAA-999 (aa)");
        for buffer in ["", "a", "abc123", "abc123xy", "abc123xyz"] {
            assert_eq!(mask.format(buffer.chars(), '_').chars().count(), mask.len());
        }
    }

    #[test]
    fn test_clean_applies_each_slot_class_in_turn() {
        let mask = mask("AAA-999");
        let cleaned = mask.clean("ab#12cd3xyz".chars());

        assert_eq!(cleaned, "abc3");
        assert_eq!(mask.format(cleaned.chars(), '_'), "abc-3__");
    }

    #[test]
    fn test_clean_stops_at_capacity() {
        let mask = mask("99-99");
        assert_eq!(mask.clean("123456789".chars()), "1234");
    }

    #[test]
    fn test_clean_to_explicit_limit() {
        let mask = mask("99-99");
        assert_eq!(mask.clean_to("123456789".chars(), 3), "123");
        assert_eq!(mask.clean_to("123456789".chars(), 10), "1234");
        assert_eq!(mask.clean_to("123456789".chars(), 0), "");
    }

    #[test]
    fn test_clean_strips_formatting() {
        let mask = mask("(99) 9-999");
        let formatted = mask.format("1234".chars(), '_');

        assert_eq!(formatted, "(12) 3-4__");
        assert_eq!(mask.clean(formatted.chars()), "1234");
    }

    #[test]
    fn test_clean_never_fills_trailing_literals() {
        let mask = mask("99 kg");
        assert_eq!(mask.clean("12 kg".chars()), "12");
        assert_eq!(mask.format("12".chars(), '_'), "12 kg");
    }

    #[test]
    fn test_clean_lowercase_slot_rejects_uppercase() {
        let mask = mask("aa");
        assert_eq!(mask.clean("AbCd".chars()), "bd");
    }

    #[test]
    fn test_clean_literal_only_mask() {
        assert_eq!(mask("--").clean("12".chars()), "");
    }

    #[test]
    fn test_format_is_idempotent_through_clean() {
        let mask = mask("(99) 9-999");
        for buffer in ["", "1", "12", "1234", "123456"] {
            let formatted = mask.format(buffer.chars(), '_');
            let recleaned = mask.clean(formatted.chars());
            assert_eq!(mask.format(recleaned.chars(), '_'), formatted);
        }
    }

    #[test]
    fn test_unformat_skips_literals_a_slot_would_accept() {
        let mask = mask("+1 (999) 999-9999");
        let formatted = mask.format("555".chars(), '_');

        assert_eq!(formatted, "+1 (555) ___-____");
        assert_eq!(mask.clean(formatted.chars()), "1555");
        assert_eq!(mask.unformat(&formatted), "555");
        assert_eq!(mask.unformat("+1 (555) 123-4567"), "5551234567");
    }

    #[rstest]
    #[case("5155551234", "5155551234")]
    #[case("1555", "1555")]
    #[case("+1 555 123 4567", "5551234567")]
    #[case("+1 (5551234567___) ___-____", "5551234567")]
    fn test_unformat_raw_and_partly_formatted(#[case] candidate: &str, #[case] expected: &str) {
        assert_eq!(mask("+1 (999) 999-9999").unformat(candidate), expected);
    }

    #[test]
    fn test_clean_respects_capacity_for_arbitrary_input() {
        let mask = mask("A9A 9A9");
        for input in ["", "k1a2b3c4d5", "!!!", "K1A 2B3 extra", "1a2b3c"] {
            assert!(mask.clean(input.chars()).chars().count() <= mask.capacity());
        }
    }
}
