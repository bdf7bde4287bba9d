use super::types::GamePair;

/// Builds every matchup of the week: each unordered pair of teams twice, once with
/// each side at home. Emission order is `(i, j)` for `i < j`, lower index home first.
pub fn generate_game_pairs(teams: &[String]) -> Vec<GamePair> {
    let mut pairs = Vec::with_capacity(teams.len() * teams.len().saturating_sub(1));
    for (i, team_a) in teams.iter().enumerate() {
        for team_b in &teams[i + 1..] {
            for home in [team_a, team_b] {
                pairs.push(GamePair {
                    team_a: team_a.clone(),
                    team_b: team_b.clone(),
                    home_team: home.clone(),
                });
            }
        }
    }
    pairs
}
