//! Static reference data: known Statcast field names, pitch type codes and
//! groupings, team codes, and the outcome/zone/event code sets the metrics
//! classify rows with.

use std::fmt;
use std::str::FromStr;

use crate::error::StatcastError;

// ---------------------------------------------------------------------------
// Column – the closed set of known Statcast fields
// ---------------------------------------------------------------------------

macro_rules! statcast_columns {
    ($($variant:ident => $name:literal,)+) => {
        /// A known Statcast field. Column selections are expressed with this
        /// enum so an unknown name fails when it is parsed, not deep inside a
        /// load.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub enum Column {
            $($variant,)+
        }

        impl Column {
            /// Every known column, in canonical Statcast export order.
            pub const ALL: &'static [Column] = &[$(Column::$variant,)+];

            /// The exact (case-sensitive) field name used in season files.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Column::$variant => $name,)+
                }
            }
        }

        impl FromStr for Column {
            type Err = StatcastError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($name => Ok(Column::$variant),)+
                    other => Err(StatcastError::missing_column(other, "the column catalog")),
                }
            }
        }
    };
}

statcast_columns! {
    PitchType => "pitch_type",
    GameDate => "game_date",
    ReleaseSpeed => "release_speed",
    ReleasePosX => "release_pos_x",
    ReleasePosZ => "release_pos_z",
    PlayerName => "player_name",
    Batter => "batter",
    Pitcher => "pitcher",
    Events => "events",
    Description => "description",
    Zone => "zone",
    Des => "des",
    GameType => "game_type",
    Stand => "stand",
    PThrows => "p_throws",
    HomeTeam => "home_team",
    AwayTeam => "away_team",
    PitchResultType => "type",
    HitLocation => "hit_location",
    BbType => "bb_type",
    Balls => "balls",
    Strikes => "strikes",
    GameYear => "game_year",
    PfxX => "pfx_x",
    PfxZ => "pfx_z",
    PlateX => "plate_x",
    PlateZ => "plate_z",
    On3b => "on_3b",
    On2b => "on_2b",
    On1b => "on_1b",
    OutsWhenUp => "outs_when_up",
    Inning => "inning",
    InningTopbot => "inning_topbot",
    HcX => "hc_x",
    HcY => "hc_y",
    Vx0 => "vx0",
    Vy0 => "vy0",
    Vz0 => "vz0",
    Ax => "ax",
    Ay => "ay",
    Az => "az",
    SzTop => "sz_top",
    SzBot => "sz_bot",
    HitDistanceSc => "hit_distance_sc",
    LaunchSpeed => "launch_speed",
    LaunchAngle => "launch_angle",
    EffectiveSpeed => "effective_speed",
    ReleaseSpinRate => "release_spin_rate",
    ReleaseExtension => "release_extension",
    GamePk => "game_pk",
    Fielder2 => "fielder_2",
    ReleasePosY => "release_pos_y",
    EstimatedBaUsingSpeedangle => "estimated_ba_using_speedangle",
    EstimatedWobaUsingSpeedangle => "estimated_woba_using_speedangle",
    WobaValue => "woba_value",
    WobaDenom => "woba_denom",
    BabipValue => "babip_value",
    IsoValue => "iso_value",
    LaunchSpeedAngle => "launch_speed_angle",
    AtBatNumber => "at_bat_number",
    PitchNumber => "pitch_number",
    PitchName => "pitch_name",
    HomeScore => "home_score",
    AwayScore => "away_score",
    BatScore => "bat_score",
    FldScore => "fld_score",
    PostAwayScore => "post_away_score",
    PostHomeScore => "post_home_score",
    PostBatScore => "post_bat_score",
    PostFldScore => "post_fld_score",
    IfFieldingAlignment => "if_fielding_alignment",
    OfFieldingAlignment => "of_fielding_alignment",
    SpinAxis => "spin_axis",
    DeltaHomeWinExp => "delta_home_win_exp",
    DeltaRunExp => "delta_run_exp",
    BatSpeed => "bat_speed",
    SwingLength => "swing_length",
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Pitch types and groups
// ---------------------------------------------------------------------------

/// Statcast `pitch_type` code → display name.
pub const PITCH_TYPES: &[(&str, &str)] = &[
    ("FF", "4-Seam Fastball"),
    ("SI", "Sinker"),
    ("FC", "Cutter"),
    ("SL", "Slider"),
    ("ST", "Sweeper"),
    ("CU", "Curveball"),
    ("KC", "Knuckle Curve"),
    ("CH", "Changeup"),
    ("FS", "Splitter"),
    ("KN", "Knuckleball"),
    ("CS", "Slow Curve"),
    ("SV", "Slurve"),
    ("FA", "Fastball (generic)"),
    ("EP", "Eephus"),
    ("SC", "Screwball"),
    ("PO", "Pitchout"),
    ("IN", "Intentional Ball"),
    ("AB", "Automatic Ball"),
];

pub fn pitch_type_name(code: &str) -> Option<&'static str> {
    PITCH_TYPES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// Coarse pitch families used throughout the analyses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PitchGroup {
    Fastball,
    Breaking,
    Offspeed,
    Other,
}

impl PitchGroup {
    pub const ALL: [PitchGroup; 4] = [
        PitchGroup::Fastball,
        PitchGroup::Breaking,
        PitchGroup::Offspeed,
        PitchGroup::Other,
    ];

    /// The `pitch_type` codes belonging to this group.
    pub fn members(self) -> &'static [&'static str] {
        match self {
            PitchGroup::Fastball => &["FF", "SI", "FC", "FA"],
            PitchGroup::Breaking => &["SL", "ST", "CU", "KC", "CS", "SV"],
            PitchGroup::Offspeed => &["CH", "FS"],
            PitchGroup::Other => &["KN", "EP", "SC", "PO", "IN", "AB"],
        }
    }

    /// Group of a `pitch_type` code, `None` for unknown codes.
    pub fn of(code: &str) -> Option<PitchGroup> {
        PitchGroup::ALL
            .into_iter()
            .find(|g| g.members().contains(&code))
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PitchGroup::Fastball => "fastball",
            PitchGroup::Breaking => "breaking",
            PitchGroup::Offspeed => "offspeed",
            PitchGroup::Other => "other",
        }
    }
}

// ---------------------------------------------------------------------------
// Teams
// ---------------------------------------------------------------------------

pub const MLB_TEAMS: &[(&str, &str)] = &[
    ("AZ", "Arizona Diamondbacks"),
    ("ATL", "Atlanta Braves"),
    ("BAL", "Baltimore Orioles"),
    ("BOS", "Boston Red Sox"),
    ("CHC", "Chicago Cubs"),
    ("CWS", "Chicago White Sox"),
    ("CIN", "Cincinnati Reds"),
    ("CLE", "Cleveland Guardians"),
    ("COL", "Colorado Rockies"),
    ("DET", "Detroit Tigers"),
    ("HOU", "Houston Astros"),
    ("KC", "Kansas City Royals"),
    ("LAA", "Los Angeles Angels"),
    ("LAD", "Los Angeles Dodgers"),
    ("MIA", "Miami Marlins"),
    ("MIL", "Milwaukee Brewers"),
    ("MIN", "Minnesota Twins"),
    ("NYM", "New York Mets"),
    ("NYY", "New York Yankees"),
    ("OAK", "Oakland Athletics"),
    ("PHI", "Philadelphia Phillies"),
    ("PIT", "Pittsburgh Pirates"),
    ("SD", "San Diego Padres"),
    ("SF", "San Francisco Giants"),
    ("SEA", "Seattle Mariners"),
    ("STL", "St. Louis Cardinals"),
    ("TB", "Tampa Bay Rays"),
    ("TEX", "Texas Rangers"),
    ("TOR", "Toronto Blue Jays"),
    ("WSH", "Washington Nationals"),
];

pub fn team_name(code: &str) -> Option<&'static str> {
    MLB_TEAMS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

// ---------------------------------------------------------------------------
// Outcome descriptions and zones
// ---------------------------------------------------------------------------

/// `description` values where the batter swung (contact or not).
pub const SWING_DESCRIPTIONS: &[&str] = &[
    "swinging_strike",
    "swinging_strike_blocked",
    "foul",
    "foul_tip",
    "hit_into_play",
];

/// `description` values for a swing and miss.
pub const WHIFF_DESCRIPTIONS: &[&str] = &["swinging_strike", "swinging_strike_blocked"];

/// Zones 1-9 form the 3x3 strike zone grid.
pub const IN_ZONE: std::ops::RangeInclusive<i64> = 1..=9;

/// Zones 11-14 are the four regions outside the strike zone.
pub const OUT_ZONE: std::ops::RangeInclusive<i64> = 11..=14;

pub fn is_swing(description: &str) -> bool {
    SWING_DESCRIPTIONS.contains(&description)
}

pub fn is_whiff(description: &str) -> bool {
    WHIFF_DESCRIPTIONS.contains(&description)
}

pub fn is_in_zone(zone: i64) -> bool {
    IN_ZONE.contains(&zone)
}

pub fn is_out_of_zone(zone: i64) -> bool {
    OUT_ZONE.contains(&zone)
}

// ---------------------------------------------------------------------------
// Terminal events
// ---------------------------------------------------------------------------

pub const STRIKEOUT_EVENTS: &[&str] = &["strikeout", "strikeout_double_play"];

pub const WALK_EVENTS: &[&str] = &["walk", "intent_walk"];

pub const HOME_RUN_EVENT: &str = "home_run";

pub const HIT_BY_PITCH_EVENT: &str = "hit_by_pitch";

/// `events` values that close out a plate-appearance key without being a
/// batting result (the inning ended on the bases mid at-bat).
pub const NON_BATTING_EVENTS: &[&str] = &[
    "caught_stealing_2b",
    "caught_stealing_3b",
    "caught_stealing_home",
    "pickoff_1b",
    "pickoff_2b",
    "pickoff_3b",
    "pickoff_caught_stealing_2b",
    "pickoff_caught_stealing_3b",
    "pickoff_caught_stealing_home",
    "stolen_base_2b",
    "stolen_base_3b",
    "stolen_base_home",
    "other_out",
    "wild_pitch",
    "passed_ball",
    "balk",
    "other_advance",
    "truncated_pa",
    "game_advisory",
];

/// Whether a terminal event counts as a plate-appearance result.
pub fn is_batting_event(event: &str) -> bool {
    !NON_BATTING_EVENTS.contains(&event)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_names_round_trip_through_from_str() {
        for col in Column::ALL {
            let parsed: Column = col.as_str().parse().unwrap();
            assert_eq!(parsed, *col);
        }
    }

    #[test]
    fn test_unknown_column_is_missing_column() {
        let err = "Launch_Speed".parse::<Column>().unwrap_err();
        match err {
            StatcastError::MissingColumn { column, .. } => assert_eq!(column, "Launch_Speed"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_pitch_groups_partition_pitch_types() {
        for (code, _) in PITCH_TYPES {
            let groups: Vec<_> = PitchGroup::ALL
                .into_iter()
                .filter(|g| g.members().contains(code))
                .collect();
            assert_eq!(groups.len(), 1, "{code} should be in exactly one group");
        }
        assert_eq!(PitchGroup::of("ST"), Some(PitchGroup::Breaking));
        assert_eq!(PitchGroup::of("ZZ"), None);
    }

    #[test]
    fn test_zone_membership() {
        assert!(is_in_zone(1));
        assert!(is_in_zone(9));
        assert!(!is_in_zone(10));
        assert!(!is_out_of_zone(10));
        assert!(is_out_of_zone(11));
        assert!(is_out_of_zone(14));
    }

    #[test]
    fn test_swing_and_whiff_sets() {
        assert!(is_swing("foul_tip"));
        assert!(!is_swing("called_strike"));
        assert!(is_whiff("swinging_strike_blocked"));
        assert!(!is_whiff("foul"));
        for w in WHIFF_DESCRIPTIONS {
            assert!(is_swing(w));
        }
    }

    #[test]
    fn test_lookups() {
        assert_eq!(pitch_type_name("FF"), Some("4-Seam Fastball"));
        assert_eq!(team_name("SEA"), Some("Seattle Mariners"));
        assert!(!is_batting_event("caught_stealing_2b"));
        assert!(is_batting_event("strikeout"));
    }
}
