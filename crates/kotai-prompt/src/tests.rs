//! Unit tests for template parsing, language resolution and rendering.

use chrono::{DateTime, FixedOffset, TimeZone};
use chrono_tz::{America, Europe, Tz};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::assembler::{PromptAssembler, PromptTemplate, Slot};
use crate::context::{Clock, ClockReading, FixedClock, SmalltalkContext, SystemClock};
use crate::error::CompositionError;
use crate::language::{parse_tag, resolve, LanguageCode};
use crate::strategy::InstructionStrategy;
use crate::templates::{CONVERSATION_STARTERS, DEFAULT_ADDITIONAL_INSTRUCTIONS};

fn paris_afternoon() -> DateTime<Tz> {
    Europe::Paris.with_ymd_and_hms(2025, 6, 13, 14, 5, 0).unwrap()
}

struct BrokenClock;

impl Clock for BrokenClock {
    fn now(&self) -> Result<ClockReading, CompositionError> {
        Err(CompositionError::Clock("no time source".into()))
    }
}

// ── language ─────────────────────────────────────────────────────────

#[test]
fn every_sanctioned_code_resolves_to_text() {
    assert!(!resolve(None).is_empty());
    for code in LanguageCode::ALL {
        assert!(!resolve(Some(code)).is_empty(), "{code} resolved empty");
    }
}

#[test]
fn absent_and_english_share_a_fragment() {
    assert_eq!(resolve(None), resolve(Some(LanguageCode::En)));
    assert!(resolve(None).contains("some French"));
}

#[test]
fn bilingual_codes_differ_only_in_order() {
    assert_eq!(resolve(Some(LanguageCode::EnFr)), "You speak English and French");
    assert_eq!(resolve(Some(LanguageCode::FrEn)), "You speak French and English");
}

#[test]
fn parse_tag_rejects_unmapped_codes() {
    for tag in ["de", "", "EN", "en-fr", "fr/en "] {
        match parse_tag(Some(tag)) {
            Err(CompositionError::UnknownLanguage(t)) => assert_eq!(t, tag),
            other => panic!("expected UnknownLanguage for {tag:?}, got {other:?}"),
        }
    }
}

#[test]
fn parse_tag_accepts_absence_and_known_tags() {
    assert_eq!(parse_tag(None).unwrap(), None);
    for code in LanguageCode::ALL {
        assert_eq!(parse_tag(Some(code.as_str())).unwrap(), Some(code));
    }
}

// ── template parsing ─────────────────────────────────────────────────

#[test]
fn builtin_template_parses_in_documented_order() {
    let template = PromptTemplate::builtin().expect("built-in template should parse");
    assert_eq!(
        template.slot_order(),
        vec![
            Slot::VoiceBasics,
            Slot::LanguageInstructions,
            Slot::AdditionalInstructions,
            Slot::ModelName,
        ]
    );
}

#[test]
fn parse_rejects_unknown_placeholder() {
    let err = PromptTemplate::parse(
        "{voice_basics}{language_instructions}{additional_instructions}{model_name}{persona}",
    )
    .unwrap_err();
    assert!(matches!(err, CompositionError::Template(ref m) if m.contains("persona")));
}

#[test]
fn parse_rejects_missing_and_repeated_slots() {
    let missing =
        PromptTemplate::parse("{voice_basics}{language_instructions}{additional_instructions}");
    assert!(matches!(missing, Err(CompositionError::Template(ref m)) if m.contains("model_name")));

    let repeated = PromptTemplate::parse(
        "{voice_basics}{language_instructions}{additional_instructions}{model_name}{model_name}",
    );
    assert!(matches!(repeated, Err(CompositionError::Template(ref m)) if m.contains("2 times")));
}

#[test]
fn parse_rejects_unbalanced_braces() {
    assert!(PromptTemplate::parse("{voice_basics").is_err());
    assert!(PromptTemplate::parse(
        "}{voice_basics}{language_instructions}{additional_instructions}{model_name}"
    )
    .is_err());
}

#[test]
fn doubled_braces_are_literal() {
    let assembler = PromptAssembler::from_template_text(
        "{{json}} {voice_basics}|{language_instructions}|{additional_instructions}|{model_name}",
    )
    .unwrap();
    assert_eq!(assembler.assemble("a", "b", "c", "d"), "{json} a|c|b|d");
}

// ── assembly ─────────────────────────────────────────────────────────

#[test]
fn assemble_places_each_value_in_its_section() {
    let assembler = PromptAssembler::builtin().unwrap();
    let out = assembler.assemble("<basics>", "<extra>", "<lang>", "<model>");

    let basics = out.find("<basics>").unwrap();
    let lang = out.find("<lang>").unwrap();
    let extra = out.find("<extra>").unwrap();
    let model = out.find("<model>").unwrap();
    assert!(basics < lang && lang < extra && extra < model);

    let about = out.find("# ABOUT YOU").unwrap();
    assert!(model > about, "model label belongs to the closing section");
    let style = out.find("# CONVERSATION STYLE").unwrap();
    let personality = out.find("# PERSONALITY").unwrap();
    assert!(style < extra && extra < personality);
}

#[test]
fn assemble_keeps_section_order_when_values_are_permuted() {
    let assembler = PromptAssembler::builtin().unwrap();
    let values = ["alpha", "beta", "gamma", "delta"];
    let headings = [
        "# VOICE CONVERSATION",
        "# CONVERSATION STYLE",
        "# PERSONALITY",
        "# LANGUAGE SWITCHING",
        "# SILENCE HANDLING",
        "# ABOUT YOU",
    ];

    for shift in 0..values.len() {
        let v: Vec<&str> = (0..4).map(|i| values[(i + shift) % 4]).collect();
        let out = assembler.assemble(v[0], v[1], v[2], v[3]);
        let positions: Vec<usize> = headings.iter().map(|h| out.find(h).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]), "shift {shift}");
    }
}

#[test]
fn builtin_assemblers_share_the_static_template() {
    let builtin = PromptTemplate::builtin().unwrap();
    let a = PromptAssembler::builtin().unwrap();
    let b = PromptAssembler::builtin().unwrap();
    assert!(std::ptr::eq(&*a.template, builtin));
    assert!(std::ptr::eq(&*b.template, &*a.template));
    assert!(std::ptr::eq(&*a.clone().template, builtin));
}

#[test]
fn assemble_accepts_empty_inputs() {
    let assembler = PromptAssembler::builtin().unwrap();
    let out = assembler.assemble("", "", "", "");
    assert!(out.contains("Your model is \"\"."));
    assert!(!out.contains('{'));
}

#[test]
fn assemble_is_idempotent() {
    let assembler = PromptAssembler::builtin().unwrap();
    let first = assembler.assemble("a", "b", "c", "d");
    for _ in 0..5 {
        assert_eq!(assembler.assemble("a", "b", "c", "d"), first);
    }
}

// ── context ──────────────────────────────────────────────────────────

#[test]
fn smalltalk_context_formats_time_and_zone_from_one_read() {
    let reading = ClockReading::in_zone(paris_afternoon());
    let ctx = SmalltalkContext::at(reading, CONVERSATION_STARTERS[0]);
    assert_eq!(ctx.current_time, "Friday, June 13, 2025 at 14:05");
    assert_eq!(ctx.timezone, "CEST");
}

#[test]
fn zone_abbreviation_follows_daylight_saving() {
    let winter = Europe::Paris.with_ymd_and_hms(2025, 1, 10, 9, 0, 0).unwrap();
    assert_eq!(ClockReading::in_zone(winter).zone, "CET");

    let toronto = America::Toronto.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let reading = ClockReading::in_zone(toronto);
    assert_eq!(reading.zone, "EST");
    assert_eq!(reading.time.offset().local_minus_utc(), -5 * 3600);

    let utc = Tz::UTC.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    assert_eq!(ClockReading::in_zone(utc).zone, "UTC");
}

#[test]
fn reading_keeps_the_offset_of_the_same_instant() {
    let reading = ClockReading::in_zone(paris_afternoon());
    assert_eq!(reading.time.offset(), &FixedOffset::east_opt(2 * 3600).unwrap());
    assert_eq!(reading.time.format("%H:%M").to_string(), "14:05");
}

#[test]
fn system_clock_reports_named_zone() {
    let reading = SystemClock::in_zone("UTC").now().unwrap();
    assert_eq!(reading.zone, "UTC");
    assert_eq!(reading.time.offset().local_minus_utc(), 0);

    let paris = SystemClock::in_zone("Europe/Paris").now().unwrap();
    assert!(paris.zone == "CET" || paris.zone == "CEST", "{}", paris.zone);
}

#[test]
fn system_clock_rejects_unknown_zone() {
    let err = SystemClock::in_zone("Mars/Olympus_Mons").now().unwrap_err();
    assert!(matches!(err, CompositionError::Clock(ref m) if m.contains("Mars/Olympus_Mons")));
}

// ── strategies ───────────────────────────────────────────────────────

#[test]
fn constant_render_is_deterministic() {
    let strategy = InstructionStrategy::Constant {
        text: "Ask about their day.".into(),
        language: Some(LanguageCode::EnFr),
    };
    assert_eq!(strategy.render().unwrap(), strategy.render().unwrap());
}

#[test]
fn constant_default_uses_filler_text() {
    let prompt = InstructionStrategy::constant(None).render().unwrap();
    assert!(prompt.contains(DEFAULT_ADDITIONAL_INSTRUCTIONS));
}

#[test]
fn smalltalk_render_with_fixed_inputs_is_reproducible() {
    let assembler = PromptAssembler::builtin().unwrap();
    let clock = FixedClock::at(paris_afternoon());
    let strategy = InstructionStrategy::Smalltalk { language: None };

    let a = strategy
        .render_with(&assembler, "test-model", &clock, &mut StdRng::seed_from_u64(7))
        .unwrap();
    let b = strategy
        .render_with(&assembler, "test-model", &clock, &mut StdRng::seed_from_u64(7))
        .unwrap();
    assert_eq!(a, b);
    assert!(a.contains("It's Friday, June 13, 2025 at 14:05 in your timezone (CEST)."));
    assert!(a.contains("Your model is \"test-model\"."));
}

#[test]
fn smalltalk_render_embeds_exactly_one_starter() {
    let assembler = PromptAssembler::builtin().unwrap();
    let clock = FixedClock::at(paris_afternoon());
    let strategy = InstructionStrategy::Smalltalk { language: None };

    for seed in 0..32 {
        let prompt = strategy
            .render_with(&assembler, "m", &clock, &mut StdRng::seed_from_u64(seed))
            .unwrap();
        let found: Vec<&str> = CONVERSATION_STARTERS
            .iter()
            .copied()
            .filter(|s| prompt.contains(&format!("Start with a greeting and {s}.")))
            .collect();
        assert_eq!(found.len(), 1, "seed {seed}: {found:?}");
    }
}

#[test]
fn smalltalk_render_propagates_clock_failure() {
    let assembler = PromptAssembler::builtin().unwrap();
    let strategy = InstructionStrategy::Smalltalk { language: None };
    let err = strategy
        .render_with(&assembler, "m", &BrokenClock, &mut StdRng::seed_from_u64(1))
        .unwrap_err();
    assert!(matches!(err, CompositionError::Clock(_)));
}

#[test]
fn constant_render_never_reads_the_clock() {
    let assembler = PromptAssembler::builtin().unwrap();
    let strategy = InstructionStrategy::constant(Some(LanguageCode::Fr));
    assert!(strategy
        .render_with(&assembler, "m", &BrokenClock, &mut StdRng::seed_from_u64(1))
        .is_ok());
}

#[test]
fn strategy_deserializes_from_tagged_table() {
    let strategy: InstructionStrategy = toml::from_str(
        r#"
        type = "constant"
        text = "Talk about cats."
        language = "fr/en"
        "#,
    )
    .unwrap();
    assert_eq!(
        strategy,
        InstructionStrategy::Constant {
            text: "Talk about cats.".into(),
            language: Some(LanguageCode::FrEn),
        }
    );

    let smalltalk: InstructionStrategy = toml::from_str(r#"type = "smalltalk""#).unwrap();
    assert_eq!(smalltalk, InstructionStrategy::Smalltalk { language: None });
}

#[test]
fn strategy_deserialization_rejects_unknown_language() {
    let result: Result<InstructionStrategy, _> =
        serde_json::from_str(r#"{"type": "smalltalk", "language": "de"}"#);
    assert!(result.is_err());
}

#[test]
fn constant_without_text_falls_back_to_filler() {
    let strategy: InstructionStrategy = serde_json::from_str(r#"{"type": "constant"}"#).unwrap();
    assert_eq!(strategy, InstructionStrategy::constant(None));
}
