use rand::rngs::StdRng;
use rand::{ Rng, SeedableRng };

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhilosopherQuote {
    pub philosopher: &'static str,
    pub year: &'static str,
    pub quote: &'static str,
    pub relevance: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SongReference {
    pub song: &'static str,
    pub band: &'static str,
    pub message: &'static str,
}

pub static PHILOSOPHER_QUOTES: &[PhilosopherQuote] = &[
    PhilosopherQuote {
        philosopher: "Marcus Aurelius",
        year: "around 170 AD",
        quote: "You have power over your mind - not outside events. Realize this, and you will find strength",
        relevance: "this reminds us that even when technology fails us, we can still find wisdom within",
    },
    PhilosopherQuote {
        philosopher: "Epictetus",
        year: "around 108 AD",
        quote: "It's not what happens to you, but how you react to it that matters",
        relevance: "this speaks to the one thing a dropped connection can never take from you",
    },
    PhilosopherQuote {
        philosopher: "Seneca",
        year: "around 65 AD",
        quote: "Luck is what happens when preparation meets opportunity",
        relevance: "this suggests the answer you came for is worth asking again in a moment",
    },
    PhilosopherQuote {
        philosopher: "Albert Camus",
        year: "in 1942",
        quote: "One must imagine Sisyphus happy",
        relevance: "this speaks to pushing the boulder of a failed request back up the hill",
    },
    PhilosopherQuote {
        philosopher: "Lao Tzu",
        year: "around 400 BC",
        quote: "Nature does not hurry, yet everything is accomplished",
        relevance: "this reminds us that patience is its own kind of answer",
    },
    PhilosopherQuote {
        philosopher: "Friedrich Nietzsche",
        year: "in 1888",
        quote: "That which does not kill us makes us stronger",
        relevance: "this speaks to every glitch as a rehearsal for resilience",
    },
    PhilosopherQuote {
        philosopher: "Simone de Beauvoir",
        year: "in 1947",
        quote: "Change your life today. Don't gamble on the future, act now, without delay",
        relevance: "this suggests you already hold more of the answer than any machine",
    }
];

pub static SONG_REFERENCES: &[SongReference] = &[
    SongReference {
        song: "Rise Above",
        band: "Black Flag",
        message: "sometimes you just have to push through the obstacles and keep going",
    },
    SongReference {
        song: "Clampdown",
        band: "The Clash",
        message: "don't let the machinery of the world grind your spirit down",
    },
    SongReference {
        song: "Waiting Room",
        band: "Fugazi",
        message: "sitting still is only waiting if you stop thinking",
    },
    SongReference {
        song: "Minor Threat",
        band: "Minor Threat",
        message: "the clock keeps moving whether you are ready or not, so make it count",
    },
    SongReference {
        song: "Holiday in Cambodia",
        band: "Dead Kennedys",
        message: "comfort can blind you to what really matters",
    },
    SongReference {
        song: "Where Is My Mind?",
        band: "Pixies",
        message: "losing the thread is the first step to finding a better one",
    },
    SongReference {
        song: "Ever Fallen in Love",
        band: "Buzzcocks",
        message: "the things that frustrate us most are the things we care about most",
    }
];

pub fn format_wisdom(quote: &PhilosopherQuote, song: &SongReference) -> String {
    format!(
        "Well, you see, as {} said {} '{}' - {}, or even more wisely from the song {} from the infinitely wise {}: '{}.'",
        quote.philosopher,
        quote.year,
        quote.quote,
        quote.relevance,
        song.song,
        song.band,
        song.message
    )
}

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x100000001b3;

/// 64-bit FNV-1a over the UTF-8 bytes. Fixed by definition, so a seed keeps
/// mapping a message to the same pick across toolchains and builds.
fn message_hash(message: &str) -> u64 {
    message.bytes().fold(FNV_OFFSET_BASIS, |hash, byte| (hash ^ u64::from(byte)).wrapping_mul(FNV_PRIME))
}

/// Picks one quote and one song per message. The same seed and message
/// always yield the same text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CannedWisdom {
    seed: u64,
}

impl CannedWisdom {
    pub fn new(seed: Option<u64>) -> Self {
        Self { seed: seed.unwrap_or_else(rand::random) }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn pick(&self, message: &str) -> (&'static PhilosopherQuote, &'static SongReference) {
        // `StdRng` streams are only stable within a `rand` major version.
        let mut rng = StdRng::seed_from_u64(self.seed ^ message_hash(message));

        let quote = &PHILOSOPHER_QUOTES[rng.gen_range(0..PHILOSOPHER_QUOTES.len())];
        let song = &SONG_REFERENCES[rng.gen_range(0..SONG_REFERENCES.len())];
        (quote, song)
    }

    pub fn compose(&self, message: &str) -> String {
        let (quote, song) = self.pick(message);
        format_wisdom(quote, song)
    }
}
