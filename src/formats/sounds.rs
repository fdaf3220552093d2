//! Sound graph definitions (`SOUNDS.DAT15` and the radio episode variants).
//!
//! Fields marked `[hash]` name other sounds in the same graph; `[archive]`
//! fields name the wave bank a simple sound plays from.

use crate::file::{Format, MetadataFile};
use crate::hash::HashId;
use crate::wire::Array;

// ── Enumerations ─────────────────────────────────────────────────────────────

crate::symbolic_enum! {
    /// Arithmetic applied by a math operation sound.
    pub enum MathOperationNames as MathOperation: u8 {
        "MATH_OPERATION_ADD"            = 0,
        "MATH_OPERATION_SUBTRACT"       = 1,
        "MATH_OPERATION_MULTIPLY"       = 2,
        "MATH_OPERATION_DIVIDE"         = 3,
        "MATH_OPERATION_SET"            = 4,
        "MATH_OPERATION_MOD"            = 5,
        "MATH_OPERATION_MIN"            = 6,
        "MATH_OPERATION_MAX"            = 7,
        "MATH_OPERATION_ABS"            = 8,
        "MATH_OPERATION_SIGN"           = 9,
        "MATH_OPERATION_FLOOR"          = 10,
        "MATH_OPERATION_CEIL"           = 11,
        "MATH_OPERATION_RAND"           = 12,
        "MATH_OPERATION_SIN"            = 13,
        "MATH_OPERATION_COS"            = 14,
        "MATH_OPERATION_SQRT"           = 15,
        "MATH_OPERATION_DBTOLINEAR"     = 16,
        "MATH_OPERATION_LINEARTODB"     = 17,
        "MATH_OPERATION_PITCHTORATIO"   = 18,
        "MATH_OPERATION_RATIOTOPITCH"   = 19,
        "MATH_OPERATION_GETTIME"        = 20,
        "MATH_OPERATION_FSEL"           = 21,
        "MATH_OPERATION_VALUEINRANGE"   = 22,
        "MATH_OPERATION_CLAMP"          = 23,
        "MATH_OPERATION_POW"            = 24,
        "MATH_OPERATION_ROUND"          = 25,
        "MATH_OPERATION_SCALEDSIN"      = 26,
        "MATH_OPERATION_SCALEDTRI"      = 27,
        "MATH_OPERATION_SCALEDSAW"      = 28,
        "MATH_OPERATION_SCALEDSQUARE"   = 29,
        "MATH_OPERATION_SMOOTH"         = 30,
        "MATH_OPERATION_GETSCALEDTIME"  = 31,
    }
}

crate::symbolic_enum! {
    /// Comparison evaluated by an if sound.
    pub enum IfConditionNames as IfCondition: u8 {
        "IF_CONDITION_LESS_THAN"                = 0,
        "IF_CONDITION_LESS_THAN_OR_EQUAL_TO"    = 1,
        "IF_CONDITION_GREATER_THAN"             = 2,
        "IF_CONDITION_GREATER_THAN_OR_EQUAL_TO" = 3,
        "IF_CONDITION_EQUAL_TO"                 = 4,
        "IF_CONDITION_NOT_EQUAL_TO"             = 5,
    }
}

// ── Array elements ───────────────────────────────────────────────────────────

crate::record! {
    pub struct MultitrackTrack {
        track:  HashId => "TrackHash" [hash],
        unused: u32    => "unused",
    }
}

crate::record! {
    pub struct BlockVariable {
        hash:          HashId => "Hash",
        data:          f32    => "Data",
        variable_type: u8     => "VariableType",
    }
}

crate::record! {
    pub struct Operation {
        operation:          MathOperation => "Operation",
        operand_a_static:   f32           => "OperandAStatic",
        operand_a_variable: HashId        => "OperandAVariable",
        operand_b_static:   f32           => "OperandBStatic",
        operand_b_variable: HashId        => "OperandBVariable",
        operand_c_static:   f32           => "OperandCStatic",
        operand_c_variable: HashId        => "OperandCVariable",
        output_variable:    HashId        => "OutputVariable",
    }
}

crate::record! {
    pub struct WeightedSound {
        sound:  HashId => "SoundHash" [hash],
        weight: f32    => "Weight",
    }
}

crate::record! {
    /// Child reference used by twin loop, sequential and streaming sounds.
    pub struct ChildSound {
        sound:  HashId => "SoundHash" [hash],
        unused: u32    => "unused",
    }
}

// ── Variants ─────────────────────────────────────────────────────────────────

crate::identified_record! {
    pub struct LoopingSound = 1, "audLoopingSound" {
        loop_count:          u16    => "LoopCount",
        loop_count_variance: u16    => "LoopCountVariance",
        sound:               HashId => "SoundHash" [hash],
    }
}

crate::identified_record! {
    pub struct EnvelopeSound = 2, "audEnvelopeSound" {
        attack:           u16    => "Attack",
        decay:            u16    => "Decay",
        sustain:          u8     => "Sustain",
        hold:             i32    => "Hold",
        release:          i32    => "Release",
        attack_curve:     HashId => "AttackCurve",
        decay_curve:      HashId => "DecayCurve",
        release_curve:    HashId => "ReleaseCurve",
        attack_variable:  HashId => "AttackVariable",
        decay_variable:   HashId => "DecayVariable",
        sustain_variable: HashId => "SustainVariable",
        hold_variable:    HashId => "HoldVariable",
        release_variable: HashId => "ReleaseVariable",
        sound:            HashId => "SoundHash" [hash],
    }
}

crate::identified_record! {
    pub struct TwinLoopSound = 3, "audTwinLoopSound" {
        min_swap_time:               i16                => "MinSwapTime",
        max_swap_time:               i16                => "MaxSwapTime",
        min_crossfade_time:          i16                => "MinCrossfadeTime",
        max_crossfade_time:          i16                => "MaxCrossfadeTime",
        crossfade_curve:             HashId             => "CrossfadeCurve",
        min_swap_time_variable:      HashId             => "MinSwapTimeVariable",
        max_swap_time_variable:      HashId             => "MaxSwapTimeVariable",
        min_crossfade_time_variable: HashId             => "MinCrossfadeTimeVariable",
        max_crossfade_time_variable: HashId             => "MaxCrossfadeTimeVariable",
        sounds:                      Array<ChildSound>  => "Sounds",
    }
}

crate::identified_record! {
    pub struct SpeechSound = 4, "audSpeechSound" {}
}

crate::identified_record! {
    pub struct OnStopSound = 5, "audOnStopSound" {
        child:    HashId => "ChildSound" [hash],
        on_pause: HashId => "OnPauseSound" [hash],
        on_end:   HashId => "OnEndSound" [hash],
    }
}

crate::identified_record! {
    pub struct WrapperSound = 6, "audWrapperSound" {
        sound: HashId => "SoundHash" [hash],
    }
}

crate::identified_record! {
    pub struct SequentialSound = 7, "audSequentialSound" {
        sounds: Array<ChildSound> => "Sounds",
    }
}

crate::identified_record! {
    pub struct StreamingSound = 8, "audStreamingSound" {
        duration: u32               => "Duration",
        sounds:   Array<ChildSound> => "Sounds",
    }
}

crate::identified_record! {
    pub struct RetriggeredOverlappedSound = 9, "audRetriggeredOverlappedSound" {
        loop_count:          i16    => "LoopCount",
        delay_time:          u16    => "DelayTime",
        loop_count_variable: HashId => "LoopCountVariable",
        delay_time_variable: HashId => "DelayTimeVariable",
        sound:               HashId => "SoundHash" [hash],
    }
}

crate::identified_record! {
    pub struct CrossfadeSound = 10, "audCrossfadeSound" {
        near:                  HashId => "NearSound" [hash],
        far:                   HashId => "FarSound" [hash],
        mode:                  u8     => "Mode",
        min_distance:          f32    => "MinDistance",
        max_distance:          f32    => "MaxDistance",
        hysteresis:            i32    => "Hysteresis",
        crossfade_curve:       HashId => "CrossfadeCurve",
        distance_variable:     HashId => "DistanceVariable",
        min_distance_variable: HashId => "MinDistanceVariable",
        max_distance_variable: HashId => "MaxDistanceVariable",
        crossfade_variable:    HashId => "CrossfadeVariable",
    }
}

crate::identified_record! {
    pub struct CollapsingStereoSound = 11, "audCollapsingStereoSound" {
        left:                         HashId => "LeftSound" [hash],
        right:                        HashId => "RightSound" [hash],
        min_distance:                 f32    => "MinDistance",
        max_distance:                 f32    => "MaxDistance",
        min_distance_variable:        HashId => "MinDistanceVariable",
        max_distance_variable:        HashId => "MaxDistanceVariable",
        crossfade_override_variable:  HashId => "CrossfadeOverrideVariable",
        frontend_left_pan_variable:   HashId => "FrontendLeftPanVariable",
        frontend_right_pan_variable:  HashId => "FrontendRightPanVariable",
        mode:                         u8     => "Mode",
    }
}

crate::identified_record! {
    /// Plays one wave from a bank.
    pub struct SimpleSound = 12, "audSimpleSound" {
        wave_slot_index: u32    => "WaveSlotIndex",
        archive:         HashId => "ArchiveHash" [archive],
        sound:           HashId => "SoundHash",
    }
}

crate::identified_record! {
    pub struct MultitrackSound = 13, "audMultitrackSound" {
        tracks: Array<MultitrackTrack> => "Tracks",
    }
}

crate::identified_record! {
    pub struct RandomizedSound = 14, "audRandomizedSound" {
        unused:        u32                  => "unused",
        history_index: u8                   => "HistoryIndex",
        history_space: Array<u8>            => "HistorySpace",
        sounds:        Array<WeightedSound> => "Sounds",
    }
}

crate::identified_record! {
    pub struct SwitchSound = 16, "audSwitchSound" {
        control_variable: HashId                  => "ControlVariable",
        sounds:           Array<HashId, u8, true> => "Sounds",
    }
}

crate::identified_record! {
    pub struct VariableCurveSound = 17, "audVariableCurveSound" {
        sound:           HashId => "SoundHash" [hash],
        input_variable:  HashId => "InputVariable",
        output_variable: HashId => "OutputVariable",
        curve:           HashId => "Curve",
    }
}

crate::identified_record! {
    pub struct VariablePrintValueSound = 18, "audVariablePrintValueSound" {
        variable: HashId   => "VariableHash",
        value:    [u8; 15] => "Value",
    }
}

crate::identified_record! {
    pub struct AssertSound = 19, "audAssertSound" {}
}

crate::identified_record! {
    pub struct VariableSetTimeSound = 20, "audVariableSetTimeSound" {
        variable: HashId => "VariableHash",
    }
}

crate::identified_record! {
    pub struct VariableBlockSound = 21, "audVariableBlockSound" {
        sound:     HashId               => "SoundHash" [hash],
        variables: Array<BlockVariable> => "Variables",
    }
}

crate::identified_record! {
    pub struct IfSound = 22, "audIfSound" {
        true_sound:         HashId      => "TrueSound" [hash],
        false_sound:        HashId      => "FalseSound" [hash],
        variable_a:         HashId      => "VariableA",
        operator:           IfCondition => "Operator",
        operand_b_static:   f32         => "OperandBStatic",
        operand_b_variable: HashId      => "OperandBVariable",
    }
}

crate::identified_record! {
    pub struct ForLoopSound = 23, "audForLoopSound" {
        sound:                HashId => "SoundHash" [hash],
        initial_value:        f32    => "LoopCounterInitialValue",
        initial_variable:     HashId => "LoopCounterInitialVariable",
        condition_value:      f32    => "LoopCounterConditionValue",
        condition_variable:   HashId => "LoopCounterConditionVariable",
        increment_value:      f32    => "LoopCounterIncrementValue",
        increment_variable:   HashId => "LoopCounterIncrementVariable",
        counter_variable:     HashId => "LoopCounterVariable",
    }
}

crate::identified_record! {
    pub struct MathOperationSound = 24, "audMathOperationSound" {
        sound:      HashId           => "SoundHash" [hash],
        operations: Array<Operation> => "Operations",
    }
}

crate::variants! {
    pub enum SoundVariant in "SoundsMetadataContainer" {
        Looping(LoopingSound),
        Multitrack(MultitrackSound),
        Simple(SimpleSound),
        Envelope(EnvelopeSound),
        MathOperation(MathOperationSound),
        VariableBlock(VariableBlockSound),
        Randomized(RandomizedSound),
        VariableCurve(VariableCurveSound),
        Switch(SwitchSound),
        TwinLoop(TwinLoopSound),
        Sequential(SequentialSound),
        OnStop(OnStopSound),
        RetriggeredOverlapped(RetriggeredOverlappedSound),
        If(IfSound),
        ForLoop(ForLoopSound),
        VariablePrintValue(VariablePrintValueSound),
        Crossfade(CrossfadeSound),
        Streaming(StreamingSound),
        CollapsingStereo(CollapsingStereoSound),
        Wrapper(WrapperSound),
        VariableSetTime(VariableSetTimeSound),
        Speech(SpeechSound),
        Assert(AssertSound),
    }
}

// ── Header & format ──────────────────────────────────────────────────────────

crate::optional_record! {
    /// Per-sound overrides; each one is only stored when set.
    pub struct SoundSettings {
        volume:                i16    => "Volume",
        volume_variance:       u16    => "VolumeVariance",
        pitch:                 i16    => "Pitch",
        pitch_variance:        u16    => "PitchVariance",
        pan:                   u16    => "Pan",
        pan_variance:          u16    => "PanVariance",
        pre_delay:             i16    => "PreDelay",
        pre_delay_variance:    u16    => "PreDelayVariance",
        start_offset:          i32    => "StartOffset",
        start_offset_variance: i32    => "StartOffsetVariance",
        attack_time:           u16    => "AttackTime",
        release_time:          u16    => "ReleaseTime",
        doppler_factor:        u16    => "DopplerFactor",
        category:              HashId => "CategoryHash",
        volume_curve:          HashId => "VolumeCurve",
        volume_curve_scale:    u16    => "VolumeCurveScale",
        speaker_mask:          i8     => "SpeakerMask",
        effect_route:          i8     => "EffectRoute",
        volume_variable:       HashId => "VolumeVariable",
        pitch_variable:        HashId => "PitchVariable",
        pan_variable:          HashId => "PanVariable",
        unk_variable2:         HashId => "UnkVariable2",
        unk_variable3:         HashId => "UnkVariable3",
        cutoff_variable:       HashId => "CutoffVariable",
    }
}

crate::record! {
    pub struct SoundHeader {
        flags:    u32           => "Flags",
        unk09:    u16           => "__unk09",
        settings: SoundSettings => "Header",
    }
}

pub struct Sounds;

impl Format for Sounds {
    const NAME: &'static str = "sounds";
    const VERSION: u32 = 15;

    type Header = SoundHeader;
    type Payload = SoundVariant;
}

pub type SoundsFile = MetadataFile<Sounds>;
