//! Some things are easier done if we just hard code rather than guess...
//!
//! The tournament list is picked by hand each season; there is no page on the
//! wiki that lists exactly the events we care about.

/// Tournament pages to scan, in processing order.
pub const TOURNAMENTS: [&str; 16] = [
    "The International/2025",
    "Esports World Cup/2025",
    "ESL One/Raleigh/2025",
    "DreamLeague/Season 25",
    "DreamLeague/Season 26",
    "DreamLeague/27",
    "BLAST/Slam/2",
    "BLAST/Slam/3",
    "BLAST/Slam/4",
    "PGL/Wallachia/3",
    "PGL/Wallachia/4",
    "PGL/Wallachia/5",
    "FISSURE/PLAYGROUND/1",
    "FISSURE/PLAYGROUND/2",
    "FISSURE/Universe/4",
    "Clavision/Masters/2025",
];

/// Where the dataset ends up unless overridden.
pub const OUTPUT_PATH: &str = "data/chinese_players_2025.json";

pub const USER_AGENT: &str = "cn-roster-updater/0.1 (dota2 roster dataset)";
