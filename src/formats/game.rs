//! Game-side audio objects (`GAME.DAT16` and the episode variants).
//!
//! None of these fields are marked as references, so game files carry empty
//! hash and archive offset tables.  Several object kinds have no known
//! layout; they keep their payload as opaque bytes.

use crate::file::{Format, MetadataFile};
use crate::hash::HashId;
use crate::wire::{Array, Raw, SizedString};

// ── Enumerations ─────────────────────────────────────────────────────────────

crate::symbolic_enum! {
    pub enum RadioTrackCategoryNames as RadioTrackCategory: u8 {
        "AD"           = 0,
        "IDENT"        = 1,
        "MUSIC"        = 2,
        "NEWS"         = 3,
        "WEATHER"      = 4,
        "DJ_SOLO"      = 5,
        "USER_INTRO"   = 6,
        "USER_OUTRO"   = 7,
        "USER_TO_AD"   = 8,
        "USER_TO_NEWS" = 9,
    }
}

// ── Array elements ───────────────────────────────────────────────────────────

crate::record! {
    pub struct CutsceneCategory {
        category:  HashId => "Category",
        intensity: u8     => "Intensity",
    }
}

crate::record! {
    pub struct InteriorRoom {
        room_name:               HashId => "RoomName",
        padding:                 i8     => "padding",
        reverb_large:            f32    => "ReverbLarge",
        reverb_medium:           f32    => "ReverbMedium",
        reverb_small:            f32    => "ReverbSmall",
        room_sound:              HashId => "RoomSound",
        rain_type:               i8     => "RainType",
        exterior_audibility:     f32    => "ExteriorAudibility",
        room_occlusion_damping:  f32    => "RoomOcclusionDamping",
        non_marked_portal:       f32    => "NonMarkedPortalOcclusion",
        portal_occlusion:        f32    => "DistanceFromPortalForOcclusion",
        padding1:                i8     => "padding1",
        portal_fade_distance:    f32    => "DistanceFromPortalFadeDistance",
        weapon_metrics:          HashId => "WeaponMetrics",
        walla_sound_set:         HashId => "InteriorWallaSoundSet",
    }
}

crate::record! {
    /// Shared by crime instructions and crime descriptions.
    pub struct CrimeWeight {
        hash:   HashId => "Hash",
        weight: f32    => "Weight",
    }
}

crate::record! {
    pub struct RadioTrack {
        context:   HashId => "Context",
        sound_ref: HashId => "SoundRef",
    }
}

crate::record! {
    pub struct CategoryWeight {
        category: RadioTrackCategory => "CategoryType",
        value:    i32                => "Value",
    }
}

crate::record! {
    pub struct VoiceGroup {
        voice:           HashId => "VoiceHash",
        reference_count: u32    => "ReferenceCount",
    }
}

crate::record! {
    pub struct SpeechContext {
        context:  HashId => "ContextHash",
        field04:  u32    => "_field04",
        field08:  i32    => "_field08",
        field0c:  u32    => "_field0C",
        field10:  u8     => "_field10",
        unk_hash: HashId => "UnkHash",
        field15:  u32    => "_field15",
    }
}

// ── Variants ─────────────────────────────────────────────────────────────────

crate::identified_record! {
    pub struct AmbientZoneList = 21, "gameAmbientZoneList" {
        zones: Array<HashId> => "Zones",
    }
}

crate::identified_record! {
    pub struct AmbientZone = 19, "gameAmbientZone" {
        min_x:       f32           => "MinX",
        min_y:       f32           => "MinY",
        min_z:       f32           => "MinZ",
        max_x:       f32           => "MaxX",
        max_y:       f32           => "MaxY",
        max_z:       f32           => "MaxZ",
        rules_count: u8            => "RulesCount",
        rules:       Array<HashId> => "Rules",
    }
}

crate::identified_record! {
    pub struct Collision = 1, "gameCollision" {
        data: Raw => "Data",
    }
}

crate::identified_record! {
    pub struct Clothing = 15, "gameClothing" {
        data: Raw => "Data",
    }
}

crate::identified_record! {
    pub struct Door = 25, "gameDoor" {
        data: Raw => "Data",
    }
}

crate::identified_record! {
    pub struct Cutscene = 23, "gameCutscene" {
        categories: Array<CutsceneCategory> => "Categories",
    }
}

crate::identified_record! {
    pub struct AmbientEmitter = 2, "gameAmbientEmitter" {
        child_sound:    HashId => "ChildSound",
        radio_station:  HashId => "RadioStation",
        pos_x:          f32    => "PosX",
        pos_y:          f32    => "PosY",
        pos_z:          f32    => "PosZ",
        padding:        u32    => "padding",
        interior_room:  u32    => "InteriorRoom",
        volume:         i32    => "Volume",
        lpf_cutoff:     u16    => "LPFCutoff",
        hpf_cutoff:     u16    => "HPFCutoff",
        rolloff_factor: u16    => "RolloffFactor",
        interior:       HashId => "Interior",
        padding1:       u32    => "padding1",
    }
}

crate::identified_record! {
    pub struct AmbientEmitterList = 17, "gameAmbientEmitterList" {
        emitters: Array<HashId, u16> => "Ambient Emitters",
    }
}

crate::identified_record! {
    pub struct EmitterEntity = 3, "gameEmitterEntity" {
        child_sound:                HashId => "ChildSound",
        max_distance:               f32    => "MaxDistance",
        business_hours_probability: f32    => "BusinessHoursProbability",
        evening_probability:        f32    => "EveningProbability",
        night_probability:          f32    => "NightProbability",
        cone_inner_angle:           f32    => "ConeInnerAngle",
        cone_outer_angle:           f32    => "ConeOuterAngle",
        cone_max_atten:             f32    => "ConeMaxAtten",
        unk2:                       i32    => "unk2",
    }
}

crate::identified_record! {
    pub struct Footsteps = 9, "gameFootsteps" {
        data: Raw => "Data",
    }
}

crate::identified_record! {
    pub struct Interior = 24, "gameInterior" {
        rooms: Array<InteriorRoom> => "InteriorRooms",
    }
}

crate::identified_record! {
    pub struct MeleeCombat = 5, "gameMeleeCombat" {
        data: Raw => "Data",
    }
}

crate::identified_record! {
    pub struct Crime = 14, "gameCrime" {
        instructions: Array<CrimeWeight> => "CrimeInstructions",
        descriptions: Array<CrimeWeight> => "CrimeDescriptions",
    }
}

crate::identified_record! {
    pub struct RadioStationTrackCategory = 12, "gameRadioStationTrackCategory" {
        category:      RadioTrackCategory => "Type",
        padding00:     u32                => "padding00",
        padding01:     u8                 => "padding01",
        history_space: Array<HashId>      => "NumHistorySpaceElems",
        padding02:     u16                => "padding02",
        padding03:     u32                => "padding03",
        tracks:        Array<RadioTrack>  => "Tracks",
    }
}

crate::identified_record! {
    pub struct RadioStation = 11, "gameRadioStation" {
        unused:            i32           => "unused",
        wheel_position:    i32           => "WheelPosition",
        genre:             u8            => "Genre",
        padding01:         u8            => "padding01",
        padding02:         i32           => "padding02",
        padding03:         i32           => "padding03",
        ambient_radio_vol: u8            => "AmbientRadioVol",
        name:              SizedString   => "Name",
        track_categories:  Array<HashId> => "TrackCategories",
    }
}

crate::identified_record! {
    pub struct RadioStationCategoryWeights = 13, "gameRadioStationCategoryWeights" {
        weights: Array<CategoryWeight> => "Weights",
    }
}

crate::identified_record! {
    pub struct Ped = 16, "gamePed" {
        voice_groups:      Array<VoiceGroup> => "VoiceGroups",
        mini_voice_groups: Array<VoiceGroup> => "MiniVoiceGroups",
    }
}

crate::identified_record! {
    pub struct TrainStation = 22, "gameTrainStation" {
        data: Raw => "Data",
    }
}

crate::identified_record! {
    /// Vehicle engine and body sounds.
    pub struct Automobile = 0, "gameAutomobile" {
        master_volume:                  i32    => "masterVolume",
        non_player_fx_comp:             i32    => "nonPlayerFXComp",
        low_engine_loop:                HashId => "lowEngineLoop",
        high_engine_loop:               HashId => "highEngineLoop",
        low_exhaust_loop:               HashId => "lowExhaustLoop",
        high_exhaust_loop:              HashId => "highExhaustLoop",
        revs_off_loop:                  HashId => "revsOffLoop",
        min_pitch:                      f32    => "minPitch",
        max_pitch:                      f32    => "maxPitch",
        idle_min_pitch:                 i32    => "idleMinPitch",
        idle_max_pitch:                 i32    => "idleMaxPitch",
        unk0:                           f32    => "unk0",
        unk00:                          f32    => "unk00",
        unk1:                           i32    => "unk1",
        unk2:                           i32    => "unk2",
        dump_valve_probability:         f32    => "dumpValveProbability",
        turbo_spinup_speed:             f32    => "turboSpinupSpeed",
        unk3:                           i32    => "unk3",
        unk4:                           i32    => "unk4",
        unk5:                           f32    => "unk5",
        unk6:                           f32    => "unk6",
        unk7:                           i32    => "unk7",
        unk8:                           i32    => "unk8",
        unk9:                           i32    => "unk9",
        unk10:                          f32    => "unk10",
        unk11:                          f32    => "unk11",
        unk12:                          i32    => "unk12",
        unk13:                          i32    => "unk13",
        engine_wave_shape:              HashId => "engineWaveShape",
        unk14:                          u32    => "unk14",
        exhaust_wave_shape:             HashId => "exhaustWaveShape",
        unk15:                          u32    => "unk15",
        unk16:                          i32    => "unk16",
        unk17:                          i32    => "unk17",
        engine_idle_loop:               HashId => "engineIdleLoopSound",
        exhaust_idle_loop:              HashId => "exhaustIdleLoopSound",
        unk18:                          i32    => "unk18",
        unk19:                          i32    => "unk19",
        transmission:                   HashId => "transmissionSound",
        unk20:                          i32    => "unk20",
        unk21:                          i32    => "unk21",
        induction_loop:                 HashId => "InductionLoop",
        induction_min_pitch:            i32    => "InductionMinPitch",
        induction_max_pitch:            i32    => "InductionMaxPitch",
        exhaust_pop:                    HashId => "exhaustPopSound",
        turbo_whine:                    HashId => "TurboWhine",
        turbo_min_pitch:                i32    => "TurboMinPitch",
        turbo_max_pitch:                i32    => "TurboMaxPitch",
        dump_valve:                     HashId => "dumpValveSound",
        startup_revs:                   HashId => "startupRevs",
        horn:                           HashId => "hornSounds",
        door_open:                      HashId => "doorOpenSound",
        door_close:                     HashId => "doorCloseSound",
        boot_open:                      HashId => "bootOpenSound",
        boot_close:                     HashId => "bootCloseSound",
        roll:                           f32    => "rollSound",
        suspension_up:                  HashId => "suspensionUpSound",
        suspension_down:                HashId => "suspensionDownSound",
        min_susp_comp_thresh:           f32    => "minSuspCompThresh",
        max_susp_comp_thresh:           f32    => "maxSuspCompThresh",
        scanner_manufacturer:           HashId => "policeScannerManufacturerSound",
        scanner_model:                  HashId => "policeScannerModelSound",
        scanner_vehicle_category:       HashId => "policeScannerVehicleCategorySound",
        gear_transmission:              HashId => "gearTransmissionSound",
        unk26:                          i32    => "unk26",
        unk27:                          i32    => "unk27",
        unk28:                          i32    => "unk28",
        unk29:                          i32    => "unk29",
        unk30:                          i32    => "unk30",
        unk31:                          i32    => "unk31",
        unk32:                          i32    => "unk32",
        unk33:                          i32    => "unk33",
        jump_land:                      HashId => "jumpLandSound",
        jump_land_min_thresh:           i32    => "JumpLandMinThresh",
        jump_land_max_thresh:           i32    => "JumpLandMaxThresh",
        ignition:                       HashId => "ignitionSound",
        engine_shut_down:               HashId => "engineShutDownSound",
        unk36:                          u32    => "unk36",
        indicator_on:                   HashId => "indicatorOnSound",
        indicator_off:                  HashId => "indicatorOffSound",
        cooling_fan:                    HashId => "coolingFanSound",
        null_sound1:                    HashId => "nullSound1",
        null_sound2:                    HashId => "nullSound2",
        null_sound3:                    HashId => "nullSound3",
        handbrake:                      HashId => "handbrakeSound",
        padding00:                      i16    => "padding00",
        padding01:                      i8     => "padding01",
    }
}

crate::identified_record! {
    pub struct Heli = 4, "gameHeli" {
        data: Raw => "Data",
    }
}

crate::identified_record! {
    pub struct Boat = 7, "gameBoat" {
        data: Raw => "Data",
    }
}

crate::identified_record! {
    pub struct Weapon = 8, "gameWeapon" {
        fire:              HashId => "FireHash",
        echo:              HashId => "EchoHash",
        casing_bounce:     HashId => "CasingBounceHash",
        swipe_sound:       HashId => "SwipeSoundHash",
        collision:         HashId => "CollisionHash",
        melee_collision:   HashId => "MeleeCollisionHash",
        heft:              HashId => "HeftHash",
        put_down:          HashId => "PutDownHash",
        rattle_collision:  HashId => "RattleCollisionHash",
        pickup_sound:      HashId => "PickupSoundHash",
        field00:           u8     => "__field00",
        safety_on:         HashId => "SafetyOnSound",
        safety_off:        HashId => "SafetyOffSound",
        slomo_swoosh:      HashId => "SlomoSwooshSound",
        field04:           u32    => "__field04",
        slomo_xfade:       HashId => "SlomoXfadeHash",
        slomo_collision:   HashId => "SlomoCollisionHash",
    }
}

crate::identified_record! {
    pub struct RadioStationList = 10, "gameRadioStationList" {
        stations: Array<HashId> => "Stations",
    }
}

crate::identified_record! {
    pub struct SoundRules = 20, "gameSoundRules" {
        weight:      f32    => "Weight",
        offset_x:    f32    => "OffsetX",
        offset_y:    f32    => "OffsetY",
        hours_start: u8     => "HoursStart",
        hours_end:   u8     => "HoursEnd",
        field0f:     i16    => "__field0f",
        sound:       HashId => "SoundHash",
        category:    HashId => "CategoryHash",
        unknown:     u32    => "Unknown",
    }
}

crate::identified_record! {
    pub struct ScriptedReport = 18, "gameScriptedReport" {
        data: Raw => "Data",
    }
}

crate::identified_record! {
    pub struct SpeechContexts = 6, "gameSpeechContexts" {
        contexts: Array<SpeechContext, u16> => "Contexts",
    }
}

crate::variants! {
    pub enum GameVariant in "GameMetadataContainer" {
        AmbientZoneList(AmbientZoneList),
        AmbientZone(AmbientZone),
        Collision(Collision),
        Clothing(Clothing),
        Door(Door),
        Cutscene(Cutscene),
        AmbientEmitter(AmbientEmitter),
        AmbientEmitterList(AmbientEmitterList),
        EmitterEntity(EmitterEntity),
        Footsteps(Footsteps),
        Interior(Interior),
        MeleeCombat(MeleeCombat),
        Crime(Crime),
        RadioStationTrackCategory(RadioStationTrackCategory),
        RadioStation(RadioStation),
        RadioStationCategoryWeights(RadioStationCategoryWeights),
        Ped(Ped),
        TrainStation(TrainStation),
        Automobile(Automobile),
        Heli(Heli),
        Boat(Boat),
        Weapon(Weapon),
        RadioStationList(RadioStationList),
        SoundRules(SoundRules),
        ScriptedReport(ScriptedReport),
        SpeechContexts(SpeechContexts),
    }
}

// ── Header & format ──────────────────────────────────────────────────────────

crate::record! {
    pub struct GameHeader {
        nametable_offset: u32 => "nametableOffset",
        padding:          u8  => "padding",
    }
}

pub struct Game;

impl Format for Game {
    const NAME: &'static str = "game";
    const VERSION: u32 = 16;

    type Header = GameHeader;
    type Payload = GameVariant;
}

pub type GameFile = MetadataFile<Game>;
