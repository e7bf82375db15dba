//! Road score tables for Connect6 evaluation
//!
//! Every live road (a road holding stones of one color only) contributes
//! by its stone count. Own roads are scored from [`ATTACK`], the
//! opponent's from [`DEFENSE`]. The defence table is steeper than the attack
//! table for three-stone roads, so cutting an opponent three is preferred
//! over building an equal own shape.

/// Attack weight of an own live road holding `n` stones.
pub const ATTACK: [i32; 7] = [0, 9, 520, 2_070, 7_890, 10_020, 1_000_000];

/// Weight of an opponent live road holding `n` stones.
pub const DEFENSE: [i32; 7] = [0, 3, 480, 2_670, 3_887, 4_900, 1_000_000];

/// Powers of ten by stone count, used by the single-cell spot score.
pub const POW: [i32; 7] = [1, 10, 100, 1_000, 10_000, 100_000, 1_000_000];

/// Named bounds on evaluation output
pub struct RoadScore;

impl RoadScore {
    /// Largest magnitude a static evaluation can reach. Kept well below the
    /// search's mate scores so a heuristic value is never read as a win.
    pub const LIMIT: i32 = 5_000_000;
    /// Weight of one level of threat in tactical move ordering
    pub const THREAT: i32 = 1_000_000;
}

/// Score of a position from the line counts alone.
///
/// `mine[n]` / `theirs[n]` are the numbers of live roads holding `n` stones
/// for the side being scored and its opponent. Counts of zero and six are
/// ignored: empty roads carry no information and a six ends the game.
///
/// # Returns
/// Clamped to `[-RoadScore::LIMIT, RoadScore::LIMIT]`.
pub fn line_score(mine: &[usize; 7], theirs: &[usize; 7]) -> i32 {
    let mut score = 0i64;
    for n in 1..=5 {
        score += mine[n] as i64 * ATTACK[n] as i64;
        score -= theirs[n] as i64 * DEFENSE[n] as i64;
    }
    score.clamp(-(RoadScore::LIMIT as i64), RoadScore::LIMIT as i64) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_increase_with_count() {
        for n in 1..7 {
            assert!(ATTACK[n] > ATTACK[n - 1]);
            assert!(DEFENSE[n] > DEFENSE[n - 1]);
            assert_eq!(POW[n], POW[n - 1] * 10);
        }
    }

    #[test]
    fn test_defense_outweighs_attack_on_threes() {
        assert!(DEFENSE[3] > ATTACK[3]);
    }

    #[test]
    fn test_line_score_zero() {
        assert_eq!(line_score(&[0; 7], &[0; 7]), 0);
    }

    #[test]
    fn test_line_score_ignores_empty_and_six() {
        let mut mine = [0usize; 7];
        mine[0] = 900;
        mine[6] = 1;
        assert_eq!(line_score(&mine, &[0; 7]), 0);
    }

    #[test]
    fn test_line_score_mixed() {
        let mut mine = [0usize; 7];
        let mut theirs = [0usize; 7];
        mine[2] = 3;
        theirs[3] = 1;
        assert_eq!(line_score(&mine, &theirs), 3 * 520 - 2_670);
    }

    #[test]
    fn test_line_score_clamped() {
        let mut mine = [0usize; 7];
        mine[5] = 924;
        assert_eq!(line_score(&mine, &[0; 7]), RoadScore::LIMIT);

        let mut theirs = [0usize; 7];
        theirs[5] = 2_000;
        assert_eq!(line_score(&[0; 7], &theirs), -RoadScore::LIMIT);
    }
}
