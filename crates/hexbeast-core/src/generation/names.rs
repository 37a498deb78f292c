//! Name generation for agents and settlements

use crate::components::Name;
use rand::Rng;

/// Random agent name; roughly one in three gets an epithet.
pub fn generate_name(rng: &mut impl Rng) -> Name {
    let given = GIVEN_NAMES[rng.gen_range(0..GIVEN_NAMES.len())];
    let name = Name::new(given);
    if rng.gen_bool(1.0 / 3.0) {
        name.with_epithet(EPITHETS[rng.gen_range(0..EPITHETS.len())])
    } else {
        name
    }
}

/// Settlement name for the `index`-th settlement; wraps with a numeral.
pub fn settlement_name(index: usize) -> String {
    let base = SETTLEMENT_NAMES[index % SETTLEMENT_NAMES.len()];
    match index / SETTLEMENT_NAMES.len() {
        0 => base.to_string(),
        n => format!("{} {}", base, n + 1),
    }
}

static GIVEN_NAMES: &[&str] = &[
    "Aldo", "Bram", "Cora", "Dagny", "Edda", "Fenn", "Greta", "Hale", "Ida", "Jory", "Kell",
    "Lisbet", "Maren", "Nils", "Odile", "Pell", "Quill", "Runa", "Sten", "Tove", "Ulla", "Vidar",
    "Wren", "Ysolde", "Ansel", "Brisa", "Corwin", "Dunya", "Eskil", "Faye",
];

static EPITHETS: &[&str] = &[
    "Tall", "Quiet", "Devout", "Weaver", "Mason", "Forager", "Elder", "Young", "Lame", "Bold",
];

static SETTLEMENT_NAMES: &[&str] = &[
    "Ashford", "Brindle", "Coldwater", "Dunmere", "Eastholt", "Fallow", "Greywick", "Hollin",
];
