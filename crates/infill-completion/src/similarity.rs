//! Fuzzy string similarity
//!
//! Pure scoring function used to rank other open files by path closeness.
//! Scores land in `[0, 1]`: identical strings score 1.0, a hit on the first
//! character earns a bonus, consecutive hits score far higher than scattered
//! ones, and characters missing from the target are forgiven at the
//! configured fuzziness instead of zeroing the score.

/// Fuzziness applied to path scoring
pub const PATH_FUZZINESS: f64 = 0.5;

const CONSECUTIVE_SCORE: f64 = 0.7;
const SCATTERED_SCORE: f64 = 0.1;
const AFTER_SEPARATOR_BONUS: f64 = 0.8;
const CASE_MATCH_BONUS: f64 = 0.1;
const START_BONUS: f64 = 0.15;

/// Score how well `query` matches `target`, in `[0, 1]`
///
/// Matching is case-insensitive; `fuzziness` in `(0, 1]` weakens the penalty
/// for query characters absent from the target.
pub fn score(target: &str, query: &str, fuzziness: f64) -> f64 {
    if target == query {
        return 1.0;
    }
    if target.is_empty() || query.is_empty() {
        return 0.0;
    }

    let target_chars: Vec<char> = target.chars().collect();
    let target_lower: Vec<char> = target_chars.iter().map(|c| c.to_ascii_lowercase()).collect();
    let query_chars: Vec<char> = query.chars().collect();

    let mut running = 0.0;
    let mut start_at = 0usize;
    let mut fuzzies = 1.0;
    let fuzzy_factor = 1.0 - fuzziness;

    for (i, qc) in query_chars.iter().enumerate() {
        let wanted = qc.to_ascii_lowercase();
        match target_lower[start_at.min(target_lower.len())..]
            .iter()
            .position(|&c| c == wanted)
        {
            None => fuzzies += fuzzy_factor,
            Some(offset) => {
                let idx = start_at + offset;
                let mut char_score = if idx == start_at {
                    CONSECUTIVE_SCORE
                } else if idx > 0 && target_chars[idx - 1] == ' ' {
                    SCATTERED_SCORE + AFTER_SEPARATOR_BONUS
                } else {
                    SCATTERED_SCORE
                };
                if target_chars[idx] == *qc {
                    char_score += CASE_MATCH_BONUS;
                }
                running += char_score;
                start_at = idx + 1;
            }
        }
    }

    let target_len = target_chars.len() as f64;
    let query_len = query_chars.len() as f64;
    let mut final_score = 0.5 * (running / target_len + running / query_len) / fuzzies;

    let first_matches = query_chars
        .first()
        .zip(target_chars.first())
        .is_some_and(|(q, t)| q.to_ascii_lowercase() == t.to_ascii_lowercase());
    if first_matches && final_score < 0.85 {
        final_score += START_BONUS;
    }

    final_score.clamp(0.0, 1.0)
}
