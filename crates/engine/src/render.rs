//! Writing a breakdown into a target's elements.

use sc_domain::{CountdownConfig, TimeBreakdown, TimeUnit, WordSet};

use crate::element::ElementRef;

/// Element handles for one unit in structured layout.
#[derive(Clone)]
pub struct UnitSection {
    pub unit: TimeUnit,
    pub section: ElementRef,
    pub amount: ElementRef,
    pub word: ElementRef,
}

/// Output elements owned by one target.
#[derive(Clone)]
pub enum Renderer {
    /// Four `{amount, word}` pairs, one section per unit.
    Structured([UnitSection; 4]),
    /// The target itself, holding a single sentence.
    Inline(ElementRef),
}

impl Renderer {
    /// Create the output elements under `target`.
    ///
    /// Structured layout appends, per unit,
    /// `div.{section_class}.simply-{unit}-section > div > span.{amount_class} + span.{word_class}`.
    /// Inline layout creates nothing; the target is tagged with
    /// `inline_class` and each render replaces its content.
    pub fn mount(target: &ElementRef, config: &CountdownConfig) -> Self {
        if config.inline {
            target.add_class(&config.inline_class);
            return Renderer::Inline(target.clone());
        }

        Renderer::Structured(TimeUnit::ALL.map(|unit| {
            let section = target.append_child("div");
            section.add_class(&config.section_class);
            section.add_class(unit.section_class());

            let inner = section.append_child("div");
            let amount = inner.append_child("span");
            amount.add_class(&config.amount_class);
            let word = inner.append_child("span");
            word.add_class(&config.word_class);

            UnitSection {
                unit,
                section,
                amount,
                word,
            }
        }))
    }

    /// Write `breakdown` using the words currently in `config`.
    pub fn render(&self, breakdown: &TimeBreakdown, config: &CountdownConfig) {
        match self {
            Renderer::Structured(sections) => {
                for section in sections {
                    let amount = breakdown.amount(section.unit);
                    let word = config.words.unit(section.unit).pick(amount, config.plural);
                    section.amount.set_text(&format_amount(amount, config.zero_pad));
                    section.word.set_text(word);
                }
            }
            Renderer::Inline(element) => {
                element.set_text(&inline_sentence(breakdown, &config.words, config.plural));
            }
        }
    }
}

/// Decimal text of `amount`, with a single leading `0` when `zero_pad` is
/// set and the text is one character long.
pub fn format_amount(amount: u64, zero_pad: bool) -> String {
    let text = amount.to_string();
    if zero_pad && text.len() < 2 {
        format!("0{text}")
    } else {
        text
    }
}

/// `"{d} {day}, {h} {hour}, {m} {minute}, {s} {second}."`, never padded.
pub fn inline_sentence(breakdown: &TimeBreakdown, words: &WordSet, plural: bool) -> String {
    let [day, hour, minute, second] = words.select(breakdown, plural);
    format!(
        "{} {day}, {} {hour}, {} {minute}, {} {second}.",
        breakdown.days, breakdown.hours, breakdown.minutes, breakdown.seconds
    )
}
