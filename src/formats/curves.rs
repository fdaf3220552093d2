//! Curve definitions (`CURVES.DAT12`).

use crate::file::{Format, MetadataFile};
use crate::wire::{Array, PrecisionFloat};

// ── Elements ─────────────────────────────────────────────────────────────────

crate::record! {
    pub struct CurvePoint {
        x: PrecisionFloat => "x",
        y: PrecisionFloat => "y",
    }
}

crate::record! {
    pub struct CurveValue {
        y: PrecisionFloat => "y",
    }
}

// ── Variants ─────────────────────────────────────────────────────────────────

crate::identified_record! {
    pub struct Constant = 1, "audCurve_Constant" {
        value: PrecisionFloat => "Value",
    }
}

crate::identified_record! {
    pub struct Linear = 2, "audCurve_Linear" {
        left_x:  PrecisionFloat => "LeftHandPairX",
        left_y:  PrecisionFloat => "LeftHandPairY",
        right_x: PrecisionFloat => "RightHandPairX",
        right_y: PrecisionFloat => "RightHandPairY",
    }
}

crate::identified_record! {
    pub struct LinearDb = 3, "audCurve_LinearDb" {
        left_x:  PrecisionFloat => "LeftHandPairX",
        left_y:  PrecisionFloat => "LeftHandPairY",
        right_x: PrecisionFloat => "RightHandPairX",
        right_y: PrecisionFloat => "RightHandPairY",
    }
}

crate::identified_record! {
    pub struct PiecewiseLinear = 4, "audCurve_PiecewiseLinear" {
        points: Array<CurvePoint, u32> => "Points",
    }
}

crate::identified_record! {
    pub struct EqualPower = 5, "audCurve_EqualPower" {
        flip: u8 => "Flip",
    }
}

crate::identified_record! {
    pub struct ValueTable = 6, "audCurve_ValueTable" {
        values: Array<CurveValue, u16> => "Values",
    }
}

crate::identified_record! {
    pub struct Exponential = 7, "audCurve_Exponential" {
        flip:     u8             => "Flip",
        exponent: PrecisionFloat => "Exponent",
    }
}

crate::identified_record! {
    pub struct DecayingExponential = 8, "audCurve_DecayingExponential" {
        horizontal_scaling: PrecisionFloat => "HorizontalScaling",
    }
}

crate::identified_record! {
    pub struct DecayingSquaredExponential = 9, "audCurve_DecayingSquaredExponential" {
        horizontal_scaling: PrecisionFloat => "HorizontalScaling",
    }
}

crate::identified_record! {
    pub struct SineCurve = 10, "audCurve_SineCurve" {
        start_phase:      PrecisionFloat => "StartPhase",
        end_phase:        PrecisionFloat => "EndPhase",
        frequency:        PrecisionFloat => "Frequency",
        vertical_scaling: PrecisionFloat => "VerticalScaling",
        vertical_offset:  PrecisionFloat => "VerticalOffset",
    }
}

crate::identified_record! {
    pub struct OneOverX = 11, "audCurve_OneOverX" {
        horizontal_scaling: PrecisionFloat => "HorizontalScaling",
    }
}

crate::identified_record! {
    pub struct OneOverXSquared = 12, "audCurve_OneOverXSquared" {
        horizontal_scaling: PrecisionFloat => "HorizontalScaling",
    }
}

crate::identified_record! {
    pub struct DefaultDistanceAttenuation = 13, "audCurve_DefaultDistanceAttenuation" {}
}

crate::identified_record! {
    pub struct DefaultDistanceAttenuationClamped = 14, "audCurve_DefaultDistanceAttenuationClamped" {
        max_gain: i16 => "MaxGain",
    }
}

crate::identified_record! {
    pub struct DistanceAttenuationValueTable = 15, "audCurve_DistanceAttenuationValueTable" {
        values: Array<CurveValue, u16> => "Values",
    }
}

crate::variants! {
    pub enum CurveVariant in "CurvesMetadataContainer" {
        Constant(Constant),
        Linear(Linear),
        LinearDb(LinearDb),
        PiecewiseLinear(PiecewiseLinear),
        EqualPower(EqualPower),
        ValueTable(ValueTable),
        Exponential(Exponential),
        DecayingExponential(DecayingExponential),
        DecayingSquaredExponential(DecayingSquaredExponential),
        SineCurve(SineCurve),
        OneOverX(OneOverX),
        OneOverXSquared(OneOverXSquared),
        DefaultDistanceAttenuation(DefaultDistanceAttenuation),
        DefaultDistanceAttenuationClamped(DefaultDistanceAttenuationClamped),
        DistanceAttenuationValueTable(DistanceAttenuationValueTable),
    }
}

// ── Header & format ──────────────────────────────────────────────────────────

crate::record! {
    /// Fields shared by every curve.
    pub struct CurveHeader {
        flags:     u32            => "Flags",
        unk09:     u16            => "__unk09",
        unk0b:     u16            => "__unk0b",
        min_input: PrecisionFloat => "MinInput",
        max_input: PrecisionFloat => "MaxInput",
    }
}

pub struct Curves;

impl Format for Curves {
    const NAME: &'static str = "curves";
    const VERSION: u32 = 12;

    type Header = CurveHeader;
    type Payload = CurveVariant;
}

pub type CurvesFile = MetadataFile<Curves>;
