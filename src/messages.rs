//! Randomized commit messages
//!
//! Messages follow the conventional-commit shape `<type>: <phrase>`, where the
//! phrase is a template filled with a verb and a noun.

use rand::seq::IndexedRandom;
use rand::Rng;

/// Message of the first commit, which carries the scaffolded files.
pub const INITIAL_COMMIT_MESSAGE: &str = "feat: initial commit";

const COMMIT_TYPES: &[&str] = &[
    "feat", "fix", "chore", "docs", "style", "refactor", "perf", "test",
];

const VERBS: &[&str] = &[
    "reticulated",
    "recalibrated",
    "aligned",
    "demagnetized",
    "tuned",
    "overclocked",
    "realigned",
    "reversed",
    "charged",
    "flattened",
    "boosted",
    "activated",
    "uncorked",
    "shuffled",
    "smoothed",
    "ignited",
    "reinforced",
    "randomized",
    "lubricated",
    "polished",
    "merged",
    "condensed",
    "frobnicated",
    "normalized",
    "deconflicted",
];

const NOUNS: &[&str] = &[
    "splines",
    "quantum stabilizer",
    "flux capacitors",
    "bitstream",
    "entropy harmonizer",
    "cache matrix",
    "magnetic dampeners",
    "RAM coils",
    "photon array",
    "quantum spaghetti",
    "time dilation buffer",
    "turbo encabulator",
    "data vortex",
    "entropy deck",
    "space-time interpolator",
    "authentication beacons",
    "neutron form fields",
    "hypertext membrane",
    "contextual noise filter",
    "dependency gears",
    "pixel buffer",
    "wormhole branches",
    "semantic soup",
    "opcode tree",
    "chaos engine",
    "asynchronous timeline",
];

const TEMPLATES: &[&str] = &[
    "{verb} {noun} heroically",
    "completely {verb} the {noun}",
    "accidentally {verb} the {noun}",
    "{verb} the {noun} with excessive confidence",
    "{verb} the {noun} using duct tape and magic",
    "{verb} the {noun} while ignoring the consequences",
    "almost {verb} the {noun}, but got distracted",
];

/// Source of commit messages for the history driver.
pub trait MessageGenerator {
    fn next_message(&mut self) -> String;
}

/// Random message generator with its own random source.
#[derive(Debug)]
pub struct RandomMessages<R> {
    rng: R,
}

impl<R: Rng> RandomMessages<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> MessageGenerator for RandomMessages<R> {
    fn next_message(&mut self) -> String {
        random_message(&mut self.rng)
    }
}

/// Build one message, each part chosen uniformly.
pub fn random_message<R: Rng>(rng: &mut R) -> String {
    let commit_type = pick(COMMIT_TYPES, rng);
    let template = pick(TEMPLATES, rng);
    let verb = pick(VERBS, rng);
    let noun = pick(NOUNS, rng);
    format!(
        "{}: {}",
        commit_type,
        template.replace("{verb}", verb).replace("{noun}", noun)
    )
}

fn pick<R: Rng>(choices: &[&'static str], rng: &mut R) -> &'static str {
    choices.choose(rng).copied().unwrap_or_default()
}
