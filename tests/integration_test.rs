use audmeta::convert::{self, ConvertError, ConvertOptions, Direction};
use audmeta::file::{Entry, FileError};
use audmeta::formats::categories::{Category, CategoryHeader, CategoryVariant};
use audmeta::formats::curves::{CurveHeader, CurvePoint, CurveVariant, PiecewiseLinear, SineCurve};
use audmeta::formats::sounds::{
    ChildSound, IfCondition, IfSound, SequentialSound, SimpleSound, SoundHeader, SoundSettings, SoundVariant,
};
use audmeta::formats::game::{GameHeader, GameVariant, RadioStationList, ScriptedReport};
use audmeta::formats::{Categories, CategoriesFile, Curves, CurvesFile, Game, GameFile, Sounds, SoundsFile};
use audmeta::hash::{HashDictionary, HashId};
use audmeta::wire::{Array, Optional, PrecisionFloat, Raw, Wire, WireError};
use audmeta::ByteReader;
use proptest::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

// ── Fixtures ─────────────────────────────────────────────────────────────────

fn simple(name: &str, bank: &str) -> Entry<Sounds> {
    Entry::<Sounds>::new(
        name,
        SoundHeader {
            flags:    0xAAAA_AAAA,
            settings: SoundSettings { volume: Optional::present(-200), category: HashId::of("weapons").into(), ..Default::default() },
            ..Default::default()
        },
        SoundVariant::Simple(SimpleSound { wave_slot_index: 3, archive: HashId::of(bank), sound: HashId::of(name) }),
    )
}

fn sounds_fixture() -> SoundsFile {
    SoundsFile::new(vec![
        simple("pistol_shot", "weapons/pistol"),
        simple("pistol_tail", "weapons/pistol"),
        Entry::<Sounds>::new(
            "pistol",
            SoundHeader::default(),
            SoundVariant::Sequential(SequentialSound {
                sounds: vec![
                    ChildSound { sound: HashId::of("pistol_shot"), unused: 0 },
                    ChildSound { sound: HashId::of("pistol_tail"), unused: 0 },
                ]
                .into(),
            }),
        ),
        Entry::<Sounds>::new(
            "pistol_if_near",
            SoundHeader::default(),
            SoundVariant::If(IfSound {
                true_sound:         HashId::of("pistol"),
                false_sound:        HashId::NONE,
                variable_a:         HashId::of("distance"),
                operator:           IfCondition::new(2),
                operand_b_static:   25.0,
                operand_b_variable: HashId::NONE,
            }),
        ),
    ])
}

fn game_fixture() -> GameFile {
    GameFile::new(vec![
        Entry::<Game>::new(
            "radio_stations",
            GameHeader::default(),
            GameVariant::RadioStationList(RadioStationList {
                stations: vec![HashId::of("radio_01_class_rock")].into(),
            }),
        ),
        Entry::<Game>::new(
            "police_report",
            GameHeader { nametable_offset: 0, padding: 0 },
            GameVariant::ScriptedReport(ScriptedReport { data: Raw::from(vec![1, 2, 3, 4, 5]) }),
        ),
    ])
}

fn categories_fixture() -> CategoriesFile {
    let category = |name: &str, children: &[&str]| {
        Entry::<Categories>::new(
            name,
            CategoryHeader {},
            CategoryVariant::Category(Category {
                flags:            0xFFFF_0000,
                child_categories: children.iter().map(|c| HashId::of(c)).collect::<Vec<_>>().into(),
                ..Category::default()
            }),
        )
    };
    CategoriesFile::new(vec![category("base", &["weapons", "ambience"]), category("weapons", &[]), category("ambience", &[])])
}

fn curves_fixture() -> CurvesFile {
    CurvesFile::new(vec![
        Entry::<Curves>::new(
            "engine_rpm_to_pitch",
            CurveHeader { flags: 1, min_input: PrecisionFloat(0.0), max_input: PrecisionFloat(1.0), ..Default::default() },
            CurveVariant::PiecewiseLinear(PiecewiseLinear {
                points: vec![
                    CurvePoint { x: PrecisionFloat(0.0), y: PrecisionFloat(0.5) },
                    CurvePoint { x: PrecisionFloat(1.0), y: PrecisionFloat(2.0) },
                ]
                .into(),
            }),
        ),
        Entry::<Curves>::new(
            "wobble",
            CurveHeader::default(),
            CurveVariant::SineCurve(SineCurve {
                start_phase:      PrecisionFloat(0.0),
                end_phase:        PrecisionFloat(3.1415927),
                frequency:        PrecisionFloat(2.0),
                vertical_scaling: PrecisionFloat(1.0),
                vertical_offset:  PrecisionFloat(0.0),
            }),
        ),
    ])
}

fn opts() -> ConvertOptions {
    ConvertOptions::default()
}

// ── Single-file conversion ───────────────────────────────────────────────────

#[test]
fn test_sounds_unpack_pack_is_bit_exact() {
    let dir = tempdir().unwrap();
    let binary = dir.path().join("SOUNDS.DAT15");
    let original = sounds_fixture().write().unwrap();
    fs::write(&binary, &original).unwrap();

    let mut dict = HashDictionary::new();
    let unpacked = convert::unpack(&binary, None, &mut dict, &opts()).unwrap();
    assert_eq!(unpacked.output, dir.path().join("SOUNDS.DAT15.json"));
    assert_eq!(unpacked.entries, 4);

    let packed = convert::pack(&unpacked.output, None, &opts()).unwrap();
    assert_eq!(packed.output, dir.path().join("SOUNDS.DAT15.GEN"));
    assert_eq!(fs::read(&packed.output).unwrap(), original);
}

#[test]
fn test_sounds_json_shape() {
    let dir = tempdir().unwrap();
    let binary = dir.path().join("SOUNDS.DAT15");
    fs::write(&binary, sounds_fixture().write().unwrap()).unwrap();

    let mut dict = HashDictionary::new();
    dict.register("weapons");
    let summary = convert::unpack(&binary, None, &mut dict, &opts()).unwrap();
    let text: serde_json::Value = serde_json::from_slice(&fs::read(summary.output).unwrap()).unwrap();

    let names: Vec<&str> = text.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(names, ["pistol_shot", "pistol_tail", "pistol", "pistol_if_near"]);

    let shot = &text["pistol_shot"];
    assert_eq!(shot["Type"], "audSimpleSound");
    assert_eq!(shot["Flags"], 0xAAAA_AAAAu32);
    assert_eq!(shot["Header"], serde_json::json!({"Volume": -200, "CategoryHash": "weapons"}));
    assert_eq!(shot["Metadata"]["SoundHash"], "pistol_shot");
    // bank names are not in the dictionary
    assert_eq!(shot["Metadata"]["ArchiveHash"], HashId::of("weapons/pistol").fallback());

    let seq = &text["pistol"]["Metadata"]["Sounds"];
    assert_eq!(seq[1]["SoundHash"], "pistol_tail");
    assert_eq!(text["pistol_if_near"]["Metadata"]["Operator"], "IF_CONDITION_GREATER_THAN");
    assert_eq!(text["pistol_if_near"]["Metadata"]["FalseSound"], "0xFFFFFFFF");
}

#[test]
fn test_offsets_report_lists_references_and_banks() {
    let dir = tempdir().unwrap();
    let binary = dir.path().join("SOUNDS.DAT15");
    let file = sounds_fixture();
    fs::write(&binary, file.write().unwrap()).unwrap();

    let mut dict = HashDictionary::new();
    dict.register("weapons/pistol");
    let report = convert::offsets(&binary, &dict, &opts()).unwrap();
    assert_eq!(report.format, "sounds");
    assert_eq!(report.archives, ["weapons/pistol"]);
    assert_eq!(report.archive_offsets.len(), 2);
    // two children plus the if sound's true branch; the NONE false branch is skipped
    assert_eq!(report.hash_offsets.len(), 3);
    assert_eq!(file.offsets().hash.len(), 3);
}

#[test]
fn test_verify_reports_identical_bytes() {
    let dir = tempdir().unwrap();
    let binary = dir.path().join("CATEGORIES.DAT15");
    let bytes = categories_fixture().write().unwrap();
    fs::write(&binary, &bytes).unwrap();

    let report = convert::verify(&binary, &mut HashDictionary::new(), &opts()).unwrap();
    assert!(report.binary_identical);
    assert!(report.text_identical);
    assert_eq!(report.entries, 3);
    assert_eq!(report.original_crc32, crc32fast::hash(&bytes));
}

#[test]
fn test_precision_floats_are_rounded_in_text() {
    let dir = tempdir().unwrap();
    let binary = dir.path().join("CURVES.DAT12");
    fs::write(&binary, curves_fixture().write().unwrap()).unwrap();

    let summary = convert::unpack(&binary, None, &mut HashDictionary::new(), &opts()).unwrap();
    let text: serde_json::Value = serde_json::from_slice(&fs::read(&summary.output).unwrap()).unwrap();
    assert_eq!(text["wobble"]["Metadata"]["EndPhase"], 3.142);

    // the rounded value is what the packed file holds
    let packed = convert::pack(&summary.output, None, &opts()).unwrap();
    let back = CurvesFile::load(packed.output).unwrap();
    match &back.get("wobble").unwrap().payload {
        CurveVariant::SineCurve(s) => assert_eq!(s.end_phase, PrecisionFloat(3.142)),
        other => panic!("unexpected variant {other:?}"),
    }
}

#[test]
fn test_wrong_version_is_rejected() {
    let dir = tempdir().unwrap();
    let binary = dir.path().join("CURVES.DAT12");
    fs::write(&binary, categories_fixture().write().unwrap()).unwrap();

    let err = convert::unpack(&binary, None, &mut HashDictionary::new(), &opts()).unwrap_err();
    assert!(matches!(
        err,
        ConvertError::File(FileError::UnsupportedVersion { expected: 12, found: 15, .. })
    ));
    assert!(!dir.path().join("CURVES.DAT12.json").exists());
}

#[test]
fn test_missing_required_field_names_the_entry() {
    let dir = tempdir().unwrap();
    let json = dir.path().join("CATEGORIES.DAT15.json");
    fs::write(&json, r#"{"base": {"Type": "audCategory", "Metadata": {"Flags": 1}}}"#).unwrap();

    let err = convert::pack(&json, None, &opts()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("base"), "{message}");
    assert!(message.contains("__field09"), "{message}");
}

// ── Batch ────────────────────────────────────────────────────────────────────

#[test]
fn test_batch_roundtrip_over_a_game_directory() {
    let dir = tempdir().unwrap();
    let categories = categories_fixture().write().unwrap();
    let sounds = sounds_fixture().write().unwrap();
    let game = game_fixture().write().unwrap();
    fs::write(dir.path().join("CATEGORIES.DAT15"), &categories).unwrap();
    fs::write(dir.path().join("SOUNDS.DAT15"), &sounds).unwrap();
    fs::write(dir.path().join("EP1_GAME.DAT16"), &game).unwrap();

    let mut dict = HashDictionary::new();
    let report = convert::batch(dir.path(), Direction::Unpack, &mut dict, &opts());
    assert!(report.is_success());
    assert_eq!(report.converted.len(), 3);
    assert_eq!(report.missing.len(), 7);

    // category names registered from one file resolve references in another
    let text: serde_json::Value =
        serde_json::from_slice(&fs::read(dir.path().join("SOUNDS.DAT15.json")).unwrap()).unwrap();
    assert_eq!(text["pistol_shot"]["Header"]["CategoryHash"], "weapons");

    let report = convert::batch(dir.path(), Direction::Pack, &mut dict, &opts());
    assert!(report.is_success());
    assert_eq!(fs::read(dir.path().join("CATEGORIES.DAT15.GEN")).unwrap(), categories);
    assert_eq!(fs::read(dir.path().join("SOUNDS.DAT15.GEN")).unwrap(), sounds);
    assert_eq!(fs::read(dir.path().join("EP1_GAME.DAT16.GEN")).unwrap(), game);
}

#[test]
fn test_batch_keeps_going_past_a_broken_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("CURVES.DAT12"), [0u8; 3]).unwrap();
    fs::write(dir.path().join("CATEGORIES.DAT15"), categories_fixture().write().unwrap()).unwrap();

    let report = convert::batch(dir.path(), Direction::Unpack, &mut HashDictionary::new(), &opts());
    assert!(!report.is_success());
    assert_eq!(report.converted.len(), 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, dir.path().join("CURVES.DAT12"));
}

// ── Properties ───────────────────────────────────────────────────────────────

fn arb_settings() -> impl Strategy<Value = SoundSettings> {
    (
        proptest::option::of(any::<i16>()),
        proptest::option::of(any::<u16>()),
        proptest::option::of(any::<i32>()),
        proptest::option::of(any::<u32>()),
        proptest::option::of(any::<i8>()),
    )
        .prop_map(|(volume, pan, start_offset, category, speaker_mask)| SoundSettings {
            volume:       Optional(volume),
            pan:          Optional(pan),
            start_offset: Optional(start_offset),
            category:     Optional(category.map(HashId)),
            speaker_mask: Optional(speaker_mask),
            ..Default::default()
        })
}

proptest! {
    #[test]
    fn prop_settings_store_only_present_fields(settings in arb_settings()) {
        let mut out = Vec::new();
        settings.encode(&mut out).unwrap();

        let present = [
            settings.volume.is_present(),
            settings.pan.is_present(),
            settings.start_offset.is_present(),
            settings.category.is_present(),
            settings.speaker_mask.is_present(),
        ];
        let widths = [2, 2, 4, 4, 1];
        let expected: usize = 4 + present.iter().zip(widths).filter(|(p, _)| **p).map(|(_, w)| w).sum::<usize>();
        prop_assert_eq!(out.len(), expected);
        prop_assert_eq!(settings.size(), expected);

        let back = SoundSettings::decode(&mut ByteReader::new(&out)).unwrap();
        prop_assert_eq!(&back, &settings);

        let text = settings.to_text(&HashDictionary::new()).unwrap();
        let count = present.iter().filter(|p| **p).count();
        prop_assert_eq!(text.as_object().unwrap().len(), count);
        prop_assert_eq!(SoundSettings::from_text(&text).unwrap(), settings);
    }

    #[test]
    fn prop_child_lists_keep_order_and_offsets(children in proptest::collection::vec(any::<u32>(), 0..40)) {
        let entry = Entry::<Sounds>::new(
            "seq",
            SoundHeader::default(),
            SoundVariant::Sequential(SequentialSound {
                sounds: children.iter().map(|&c| ChildSound { sound: HashId(c), unused: 0 }).collect::<Vec<_>>().into(),
            }),
        );
        let file = SoundsFile::new(vec![entry]);
        let bytes = file.write().unwrap();
        let back = SoundsFile::read(&bytes).unwrap();
        prop_assert_eq!(&back, &file);

        let referenced = children.iter().filter(|&&c| c != u32::MAX).count();
        prop_assert_eq!(back.offsets().hash.len(), referenced);
    }
}

#[test]
fn test_oversized_child_list_is_rejected_on_write() {
    let sounds: Array<ChildSound> = vec![ChildSound::default(); 256].into();
    let mut out = Vec::new();
    assert!(matches!(sounds.encode(&mut out), Err(WireError::LengthOverflow { len: 256, max: 255 })));
}

#[test]
fn test_files_load_from_disk_by_type() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("curves.bin");
    curves_fixture().save(&path).unwrap();
    let loaded = CurvesFile::load(Path::new(&path)).unwrap();
    assert_eq!(loaded, curves_fixture());
    assert_eq!(loaded.names().collect::<Vec<_>>(), ["engine_rpm_to_pitch", "wobble"]);
}
