//! Curated zone choices grouped by UTC offset, for pickers in outer shells.

use serde::Serialize;

/// Zone preselected when a caller has no preference.
pub const DEFAULT_ZONE: &str = "Asia/Kolkata";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ZoneGroup {
    pub label: &'static str,
    pub abbreviation: &'static str,
    pub examples: &'static str,
    pub zones: &'static [&'static str],
}

const ZONE_GROUPS: &[ZoneGroup] = &[
    ZoneGroup {
        label: "UTC+02:00",
        abbreviation: "EET / IST",
        examples: "Israel, Jordan, Lebanon",
        zones: &[
            "Asia/Jerusalem",
            "Asia/Amman",
            "Asia/Beirut",
            "Europe/Athens",
            "Europe/Bucharest",
        ],
    },
    ZoneGroup {
        label: "UTC+03:00",
        abbreviation: "AST / MSK",
        examples: "Saudi Arabia, Iraq, Qatar, European Russia",
        zones: &["Europe/Moscow", "Asia/Riyadh", "Asia/Baghdad", "Asia/Qatar"],
    },
    ZoneGroup {
        label: "UTC+03:30",
        abbreviation: "IRST",
        examples: "Iran",
        zones: &["Asia/Tehran"],
    },
    ZoneGroup {
        label: "UTC+04:00",
        abbreviation: "AZT / GET",
        examples: "Armenia, Azerbaijan, Georgia, UAE",
        zones: &["Asia/Yerevan", "Asia/Baku", "Asia/Tbilisi", "Asia/Dubai"],
    },
    ZoneGroup {
        label: "UTC+04:30",
        abbreviation: "AFT",
        examples: "Afghanistan",
        zones: &["Asia/Kabul"],
    },
    ZoneGroup {
        label: "UTC+05:00",
        abbreviation: "PKT / MVT",
        examples: "Pakistan, Maldives",
        zones: &["Asia/Karachi", "Indian/Maldives", "Asia/Yekaterinburg"],
    },
    ZoneGroup {
        label: "UTC+05:30",
        abbreviation: "IST",
        examples: "India, Sri Lanka",
        zones: &["Asia/Kolkata", "Asia/Colombo"],
    },
    ZoneGroup {
        label: "UTC+05:45",
        abbreviation: "NPT",
        examples: "Nepal",
        zones: &["Asia/Kathmandu"],
    },
    ZoneGroup {
        label: "UTC+06:00",
        abbreviation: "BST / KGT",
        examples: "Bangladesh, Bhutan, Kyrgyzstan",
        zones: &["Asia/Dhaka", "Asia/Thimphu", "Asia/Bishkek"],
    },
    ZoneGroup {
        label: "UTC+06:30",
        abbreviation: "MMT",
        examples: "Myanmar",
        zones: &["Asia/Yangon"],
    },
    ZoneGroup {
        label: "UTC+07:00",
        abbreviation: "ICT / WIB",
        examples: "Thailand, Vietnam, Laos, Cambodia, Western Indonesia",
        zones: &[
            "Asia/Bangkok",
            "Asia/Ho_Chi_Minh",
            "Asia/Vientiane",
            "Asia/Jakarta",
        ],
    },
    ZoneGroup {
        label: "UTC+08:00",
        abbreviation: "CST / SGT / MYT",
        examples: "China, Singapore, Malaysia, Philippines",
        zones: &[
            "Asia/Shanghai",
            "Asia/Singapore",
            "Asia/Kuala_Lumpur",
            "Asia/Manila",
        ],
    },
    ZoneGroup {
        label: "UTC+09:00",
        abbreviation: "JST / KST",
        examples: "Japan, North/South Korea, eastern Indonesia",
        zones: &["Asia/Tokyo", "Asia/Seoul"],
    },
    ZoneGroup {
        label: "UTC+10:00",
        abbreviation: "PGT / ChST",
        examples: "Papua New Guinea, Guam, Northern Mariana Islands",
        zones: &["Pacific/Port_Moresby", "Pacific/Guam"],
    },
    ZoneGroup {
        label: "UTC+12:00",
        abbreviation: "ANAT / PETT",
        examples: "Far eastern Russia (e.g., Kamchatka), parts of the Pacific",
        zones: &["Asia/Kamchatka", "Pacific/Fiji", "Pacific/Auckland"],
    },
];

/// Returns the curated zone groups, ordered by offset.
pub fn zone_catalog() -> &'static [ZoneGroup] {
    ZONE_GROUPS
}
