use crate::data::error::ValidationError;
use crate::data::types::PredictionRequest;

/// Raw form input, as typed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictionForm {
    pub league: String,
    pub home_team: String,
    pub away_team: String,
}

impl PredictionForm {
    pub fn new(league: &str, home_team: &str, away_team: &str) -> Self {
        Self {
            league: league.to_string(),
            home_team: home_team.to_string(),
            away_team: away_team.to_string(),
        }
    }
}

/// Both teams present and distinct; runs before any request is made
pub fn validate_form(form: &PredictionForm) -> Result<PredictionRequest, ValidationError> {
    let home = form.home_team.trim();
    let away = form.away_team.trim();

    if home.is_empty() || away.is_empty() {
        return Err(ValidationError::MissingTeam);
    }

    if home == away {
        return Err(ValidationError::SameTeam);
    }

    Ok(PredictionRequest {
        league: form.league.trim().to_string(),
        home_team: home.to_string(),
        away_team: away.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_form() {
        let req = validate_form(&PredictionForm::new("PL", " TeamA ", "TeamB")).unwrap();
        assert_eq!(req.league, "PL");
        assert_eq!(req.home_team, "TeamA");
        assert_eq!(req.away_team, "TeamB");
    }

    #[test]
    fn test_missing_team() {
        assert_eq!(
            validate_form(&PredictionForm::new("PL", "", "TeamB")),
            Err(ValidationError::MissingTeam)
        );
        assert_eq!(
            validate_form(&PredictionForm::new("PL", "TeamA", "   ")),
            Err(ValidationError::MissingTeam)
        );
    }

    #[test]
    fn test_same_team() {
        assert_eq!(
            validate_form(&PredictionForm::new("PL", "TeamA", "TeamA")),
            Err(ValidationError::SameTeam)
        );
        assert_eq!(
            validate_form(&PredictionForm::new("PL", "TeamA ", "TeamA")),
            Err(ValidationError::SameTeam)
        );
    }

    #[test]
    fn test_league_may_be_empty() {
        assert!(validate_form(&PredictionForm::new("", "A", "B")).is_ok());
    }
}
