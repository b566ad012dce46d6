// Small deterministic random sources for noise injection and output tie-breaking.
//
// Not cryptographically secure. A fixed seed makes a whole simulation replayable.

/// Source of uniform draws in [0, 1).
///
/// The network only ever needs uniform floats: the noise term of a unit and the
/// roulette draw of output selection. Tests substitute scripted sources.
pub trait RandomSource {
    fn next_f32_01(&mut self) -> f32;
}

#[derive(Debug, Clone)]
pub struct Prng {
    state: u64,
}

impl Prng {
    pub fn new(seed: u64) -> Self {
        // xorshift never leaves the zero state.
        let seed = if seed == 0 { 0x9E3779B97F4A7C15 } else { seed };
        Self { state: seed }
    }

    #[inline]
    fn next_u64(&mut self) -> u64 {
        // xorshift64*
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545F4914F6CDD1D)
    }

    #[inline]
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }
}

impl RandomSource for Prng {
    #[inline]
    fn next_f32_01(&mut self) -> f32 {
        // 24 mantissa bits keep the result strictly below 1.0.
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
///
/// An empty script always yields 0.0.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    draws: Vec<f32>,
    cursor: usize,
}

impl ScriptedSource {
    pub fn new(draws: Vec<f32>) -> Self {
        Self { draws, cursor: 0 }
    }

    /// A source whose every draw is `value`.
    pub fn constant(value: f32) -> Self {
        Self::new(vec![value])
    }
}

impl RandomSource for ScriptedSource {
    fn next_f32_01(&mut self) -> f32 {
        if self.draws.is_empty() {
            return 0.0;
        }
        let v = self.draws[self.cursor % self.draws.len()];
        self.cursor = self.cursor.wrapping_add(1);
        v.clamp(0.0, 1.0 - f32::EPSILON)
    }
}
