use crate::data::types::Prediction;

/// Totals strictly below this are low-scoring
pub const LOW_SCORING_BELOW: f64 = 2.0;
/// Totals strictly above this are high-scoring
pub const HIGH_SCORING_ABOVE: f64 = 3.0;
/// Corner gap must exceed this to call an advantage
pub const CORNER_ADVANTAGE_GAP: f64 = 3.0;
/// Mean corners per side must exceed this for an attacking game
pub const ATTACKING_MEAN_CORNERS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    Home,
    Away,
    Draw,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalVolume {
    Low,
    Moderate,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Home,
    Away,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Style {
    Attacking,
    Conservative,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub winner: Winner,
    pub goal_volume: GoalVolume,
    pub corner_advantage: Option<Side>,
    pub style: Style,
}

pub fn classify_goals(total_goals: f64) -> GoalVolume {
    if total_goals < LOW_SCORING_BELOW {
        GoalVolume::Low
    } else if total_goals > HIGH_SCORING_ABOVE {
        GoalVolume::High
    } else {
        GoalVolume::Moderate
    }
}

pub fn corner_advantage(home_corners: f64, away_corners: f64) -> Option<Side> {
    if (home_corners - away_corners).abs() <= CORNER_ADVANTAGE_GAP {
        return None;
    }
    if home_corners > away_corners {
        Some(Side::Home)
    } else {
        Some(Side::Away)
    }
}

pub fn style(home_corners: f64, away_corners: f64) -> Style {
    if (home_corners + away_corners) / 2.0 > ATTACKING_MEAN_CORNERS {
        Style::Attacking
    } else {
        Style::Conservative
    }
}

pub fn analyze(prediction: &Prediction) -> Analysis {
    let winner = if prediction.home_team_goals > prediction.away_team_goals {
        Winner::Home
    } else if prediction.away_team_goals > prediction.home_team_goals {
        Winner::Away
    } else {
        Winner::Draw
    };

    Analysis {
        winner,
        goal_volume: classify_goals(prediction.total_goals),
        corner_advantage: corner_advantage(prediction.home_corners, prediction.away_corners),
        style: style(prediction.home_corners, prediction.away_corners),
    }
}

/// One analysis point: heading and sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisPoint {
    pub heading: &'static str,
    pub text: String,
}

impl Analysis {
    pub fn points(&self, home_team: &str, away_team: &str, prediction: &Prediction) -> Vec<AnalysisPoint> {
        let home = prediction.home_team_goals;
        let away = prediction.away_team_goals;

        let mut points = Vec::with_capacity(4);

        let winner = match self.winner {
            Winner::Home => format!("{} (home) most likely to win {}-{}", home_team, home, away),
            Winner::Away => format!("{} (away) most likely to win {}-{}", away_team, away, home),
            Winner::Draw => "A draw is likely".to_string(),
        };
        points.push(AnalysisPoint { heading: "Result", text: winner });

        let total = prediction.total_goals;
        let volume = match self.goal_volume {
            GoalVolume::Low => format!("Expect a low-scoring game ({} goals)", total),
            GoalVolume::High => format!("Expect a high-scoring game ({} goals)", total),
            GoalVolume::Moderate => format!("Expect a moderate number of goals ({} goals)", total),
        };
        points.push(AnalysisPoint { heading: "Goals", text: volume });

        if let Some(side) = self.corner_advantage {
            let team = match side {
                Side::Home => "The home side",
                Side::Away => "The away side",
            };
            points.push(AnalysisPoint {
                heading: "Corners",
                text: format!("{} has a clear advantage on corners", team),
            });
        }

        let style = match self.style {
            Style::Attacking => "Expect an attacking style with plenty of chances",
            Style::Conservative => "Expect a fairly conservative style",
        };
        points.push(AnalysisPoint { heading: "Style", text: style.to_string() });

        points
    }
}
