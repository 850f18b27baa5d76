use super::config::SeasonConfig;
use super::domain::{AgeBand, ClassLabel, Gender, Participant};
use chrono::{Datelike, NaiveDate};

/// Calendar age on `on`: year difference, minus one when the birthday has not yet come
/// around in that year.
pub fn age_on(birth_date: NaiveDate, on: NaiveDate) -> i32 {
    let mut age = on.year() - birth_date.year();
    if (on.month(), on.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// Maps birth date and gender onto one of the six competitive classes using the
/// season's configurable age thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeClassifier {
    young_class_max_age: u32,
    senior_class_min_age: u32,
    cutoff: Option<NaiveDate>,
}

impl AgeClassifier {
    pub fn new(young_class_max_age: u32, senior_class_min_age: u32) -> Self {
        Self {
            young_class_max_age,
            senior_class_min_age,
            cutoff: None,
        }
    }

    pub fn from_config(config: &SeasonConfig) -> Self {
        Self {
            young_class_max_age: config.young_class_max_age,
            senior_class_min_age: config.senior_class_min_age,
            cutoff: config.age_cutoff(),
        }
    }

    pub fn with_cutoff(mut self, cutoff: NaiveDate) -> Self {
        self.cutoff = Some(cutoff);
        self
    }

    pub fn cutoff(&self) -> Option<NaiveDate> {
        self.cutoff
    }

    /// The young bound is checked first, so a misconfigured season where
    /// `senior_class_min_age <= young_class_max_age` never yields a mid class below it.
    pub fn band_for_age(&self, age: i32) -> AgeBand {
        if age <= self.young_class_max_age as i32 {
            AgeBand::Young
        } else if age >= self.senior_class_min_age as i32 {
            AgeBand::Senior
        } else {
            AgeBand::Mid
        }
    }

    pub fn classify(
        &self,
        birth_date: Option<NaiveDate>,
        gender: Option<Gender>,
        cutoff: NaiveDate,
    ) -> Option<ClassLabel> {
        let birth_date = birth_date?;
        let gender = gender?;
        let band = self.band_for_age(age_on(birth_date, cutoff));
        Some(ClassLabel::new(band, gender))
    }

    /// Classifies against the configured cutoff. Administrative accounts are never classified.
    pub fn classify_participant(&self, participant: &Participant) -> Option<ClassLabel> {
        if participant.role_excluded {
            return None;
        }
        self.classify(participant.birth_date, participant.gender, self.cutoff?)
    }
}
