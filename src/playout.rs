//! Leaf simulation.
//!
//! Instead of playing random moves to the end of the game, a newly expanded
//! node is judged by a shallow alpha-beta search. The exploration in the tree
//! supplies the "Monte Carlo" part; the verdict itself is a tactical one.

use crate::constants::{DETERMINISTIC_SEED, VALUE_INFINITE};
use crate::position::{LeafEvaluator, Position};

/// Random source handed to the leaf evaluator.
///
/// Each worker owns one. With shuffling disabled the source is reset to the
/// same seed before every simulation, so identical positions always get the
/// same verdict regardless of how many workers run.
pub struct SimRng {
    rng: fastrand::Rng,
    deterministic: bool,
}

impl SimRng {
    pub fn new(shuffling_enabled: bool) -> Self {
        let rng = if shuffling_enabled {
            fastrand::Rng::new()
        } else {
            fastrand::Rng::with_seed(DETERMINISTIC_SEED)
        };
        Self {
            rng,
            deterministic: !shuffling_enabled,
        }
    }

    /// The generator to use for the next simulation.
    #[inline]
    pub fn for_simulation(&mut self) -> &mut fastrand::Rng {
        if self.deterministic {
            self.rng.seed(DETERMINISTIC_SEED);
        }
        &mut self.rng
    }
}

/// Judge `pos` with a full-window search of the given depth.
///
/// Returns true when the side to move in `pos` comes out ahead.
pub fn simulate<P, E>(pos: &P, evaluator: &E, depth: u8, rng: &mut SimRng) -> bool
where
    P: Position,
    E: LeafEvaluator<P> + ?Sized,
{
    let (value, _best) = evaluator.evaluate(
        pos,
        depth,
        -VALUE_INFINITE,
        VALUE_INFINITE,
        rng.for_simulation(),
    );
    value > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::Value;
    use crate::position::Color;

    #[derive(Clone)]
    struct Fixed(Value);

    impl Position for Fixed {
        type Move = u8;

        fn apply(&mut self, _mv: u8) {}

        fn side_to_move(&self) -> Color {
            Color::White
        }

        fn is_board_empty(&self) -> bool {
            false
        }
    }

    fn fixed_eval(pos: &Fixed, _d: u8, _a: Value, _b: Value, _r: &mut fastrand::Rng) -> (Value, Option<u8>) {
        (pos.0, None)
    }

    #[test]
    fn test_strictly_positive_is_win() {
        let mut rng = SimRng::new(true);
        assert!(simulate(&Fixed(1), &fixed_eval, 3, &mut rng));
        assert!(!simulate(&Fixed(0), &fixed_eval, 3, &mut rng));
        assert!(!simulate(&Fixed(-5), &fixed_eval, 3, &mut rng));
    }

    #[test]
    fn test_full_window_and_depth() {
        let check = |_: &Fixed, depth: u8, alpha: Value, beta: Value, _: &mut fastrand::Rng| {
            assert_eq!(depth, 7);
            assert_eq!(alpha, -VALUE_INFINITE);
            assert_eq!(beta, VALUE_INFINITE);
            (1, None::<u8>)
        };
        let mut rng = SimRng::new(false);
        assert!(simulate(&Fixed(0), &check, 7, &mut rng));
    }

    #[test]
    fn test_deterministic_reseeds_every_call() {
        let mut rng = SimRng::new(false);
        let first = rng.for_simulation().u64(..);
        let second = rng.for_simulation().u64(..);
        assert_eq!(first, second);
    }
}
