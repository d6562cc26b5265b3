//! Known header conventions for each dataset.
//!
//! Each convention is a flat `label -> canonical field` table. Conventions are
//! listed in priority order: on a tie the earlier one wins.

/// One header-naming convention seen in the wild.
#[derive(Debug)]
pub struct Convention {
    pub name: &'static str,
    pub labels: &'static [(&'static str, &'static str)],
}

impl Convention {
    /// Canonical field for `header`, compared case-insensitively.
    pub fn exact(&self, header: &str) -> Option<&'static str> {
        let header = header.to_lowercase();
        self.labels
            .iter()
            .find(|(label, _)| label.to_lowercase() == header)
            .map(|(_, canonical)| *canonical)
    }

    /// Canonical field of the first label that contains, or is contained in, `header`.
    pub fn partial(&self, header: &str) -> Option<&'static str> {
        let header = header.to_lowercase();
        if header.is_empty() {
            return None;
        }
        self.labels
            .iter()
            .find(|(label, _)| {
                let label = label.to_lowercase();
                header.contains(&label) || label.contains(&header)
            })
            .map(|(_, canonical)| *canonical)
    }

    pub fn label_names(&self) -> Vec<&'static str> {
        self.labels.iter().map(|(label, _)| *label).collect()
    }
}

/// Every convention a dataset may arrive in, plus its canonical field set.
#[derive(Debug)]
pub struct Catalog {
    pub dataset: &'static str,
    pub canonical_fields: &'static [&'static str],
    pub conventions: &'static [Convention],
}

impl Catalog {
    pub fn convention(&self, name: &str) -> Option<&Convention> {
        self.conventions
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn convention_names(&self) -> Vec<&'static str> {
        self.conventions.iter().map(|c| c.name).collect()
    }
}

pub const STUDENT_FIELDS: &[&str] = &[
    "census_record_1900",
    "indian_name",
    "family_name",
    "english_given_name",
    "alias",
    "sex",
    "year_of_birth",
    "arrival_at_lincoln",
    "departure_from_lincoln",
    "nation",
    "band",
    "agency",
    "trade",
    "source",
    "comments",
    "cause_of_death",
    "cemetery_burial",
    "relevant_links",
];

pub static STUDENTS: Catalog = Catalog {
    dataset: "students",
    canonical_fields: STUDENT_FIELDS,
    conventions: &[
        Convention {
            name: "spaced",
            labels: &[
                ("Census Record 1900", "census_record_1900"),
                ("Indian Name", "indian_name"),
                ("Tribal Name", "indian_name"),
                ("Family Name", "family_name"),
                ("English given name", "english_given_name"),
                ("Alias", "alias"),
                ("Sex", "sex"),
                ("Year of birth", "year_of_birth"),
                ("Arrival at Lincoln", "arrival_at_lincoln"),
                ("Departure from Lincoln", "departure_from_lincoln"),
                ("Nation", "nation"),
                ("Band", "band"),
                ("Agency", "agency"),
                ("Trade", "trade"),
                ("Source", "source"),
                ("Comments", "comments"),
                ("Cause of Death", "cause_of_death"),
                ("Cemetery / Burial", "cemetery_burial"),
                ("Cemetery / Burial with protective quotes", "cemetery_burial"),
                ("Relevant Links", "relevant_links"),
            ],
        },
        Convention {
            name: "camel",
            labels: &[
                ("censusRecord1900", "census_record_1900"),
                ("tribalName", "indian_name"),
                ("familyName", "family_name"),
                ("englishGivenName", "english_given_name"),
                ("alias", "alias"),
                ("sex", "sex"),
                ("yearOfBirth", "year_of_birth"),
                ("arrivalAtLincoln", "arrival_at_lincoln"),
                ("departureFromLincoln", "departure_from_lincoln"),
                ("nation", "nation"),
                ("band", "band"),
                ("agency", "agency"),
                ("trade", "trade"),
                ("source", "source"),
                ("comments", "comments"),
                ("causeOfDeath", "cause_of_death"),
                ("cemeteryBurial", "cemetery_burial"),
                ("relevantLinks", "relevant_links"),
            ],
        },
        Convention {
            name: "underscore",
            labels: &[
                ("census_record_1900", "census_record_1900"),
                ("indian_name", "indian_name"),
                ("family_name", "family_name"),
                ("english_given_name", "english_given_name"),
                ("alias", "alias"),
                ("sex", "sex"),
                ("year_of_birth", "year_of_birth"),
                ("arrival_at_lincoln", "arrival_at_lincoln"),
                ("departure_from_lincoln", "departure_from_lincoln"),
                ("nation", "nation"),
                ("band", "band"),
                ("agency", "agency"),
                ("trade", "trade"),
                ("source", "source"),
                ("comments", "comments"),
                ("cause_of_death", "cause_of_death"),
                ("cemetery_burial", "cemetery_burial"),
                ("relevant_links", "relevant_links"),
            ],
        },
        Convention {
            name: "short",
            labels: &[
                ("census", "census_record_1900"),
                ("tribal", "indian_name"),
                ("family", "family_name"),
                ("english", "english_given_name"),
                ("alias", "alias"),
                ("sex", "sex"),
                ("birth", "year_of_birth"),
                ("arrival", "arrival_at_lincoln"),
                ("departure", "departure_from_lincoln"),
                ("nation", "nation"),
                ("band", "band"),
                ("agency", "agency"),
                ("trade", "trade"),
                ("source", "source"),
                ("comments", "comments"),
                ("death", "cause_of_death"),
                ("burial", "cemetery_burial"),
                ("links", "relevant_links"),
            ],
        },
        // Legacy export whose header row is the column index
        Convention {
            name: "positional",
            labels: &[
                ("0", "indian_name"),
                ("1", "family_name"),
                ("2", "english_given_name"),
                ("3", "alias"),
                ("4", "sex"),
                ("5", "year_of_birth"),
                ("6", "arrival_at_lincoln"),
                ("7", "departure_from_lincoln"),
                ("8", "nation"),
                ("9", "band"),
                ("10", "agency"),
                ("11", "trade"),
                ("12", "source"),
                ("13", "comments"),
                ("14", "cause_of_death"),
                ("15", "cemetery_burial"),
                ("16", "relevant_links"),
            ],
        },
    ],
};

pub const ORPHAN_FIELDS: &[&str] = &[
    "family_name",
    "given_name",
    "aliases",
    "birth_date",
    "arrival",
    "departure",
    "scholarships",
    "assignments",
    "situation_1878",
    "assignment_scholarship_year",
    "references",
    "comments",
];

pub static ORPHANS: Catalog = Catalog {
    dataset: "orphans",
    canonical_fields: ORPHAN_FIELDS,
    conventions: &[
        Convention {
            name: "spaced",
            labels: &[
                ("Family Name", "family_name"),
                ("Given Name", "given_name"),
                ("Aliases", "aliases"),
                ("Birth Date", "birth_date"),
                ("Arrival", "arrival"),
                ("Arrival at Lincoln", "arrival"),
                ("Departure", "departure"),
                ("Departure from Lincoln", "departure"),
                ("Departure at Lincoln", "departure"),
                ("Scholarships", "scholarships"),
                ("Assignments", "assignments"),
                ("Situation, 1878", "situation_1878"),
                ("Assignment / Scholarship Year", "assignment_scholarship_year"),
                ("References", "references"),
                ("Comments", "comments"),
            ],
        },
        Convention {
            name: "snake_case",
            labels: &[
                ("family_name", "family_name"),
                ("given_name", "given_name"),
                ("aliases", "aliases"),
                ("birth_date", "birth_date"),
                ("arrival", "arrival"),
                ("arrival_at_lincoln", "arrival"),
                ("departure", "departure"),
                ("departure_from_lincoln", "departure"),
                ("departure_at_lincoln", "departure"),
                ("scholarships", "scholarships"),
                ("assignments", "assignments"),
                ("situation_1878", "situation_1878"),
                ("situation,_1878", "situation_1878"),
                ("assignment_scholarship_year", "assignment_scholarship_year"),
                ("assignment_/_scholarship_year", "assignment_scholarship_year"),
                ("references", "references"),
                ("comments", "comments"),
            ],
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_catalog_consistent(catalog: &Catalog) {
        for convention in catalog.conventions {
            for (label, canonical) in convention.labels {
                assert!(
                    catalog.canonical_fields.contains(canonical),
                    "{}:{} maps {} to unknown field {}",
                    catalog.dataset,
                    convention.name,
                    label,
                    canonical
                );
            }
        }
    }

    #[test]
    fn test_catalogs_only_name_canonical_fields() {
        assert_catalog_consistent(&STUDENTS);
        assert_catalog_consistent(&ORPHANS);
    }

    #[test]
    fn test_exact_lookup_ignores_case() {
        let spaced = STUDENTS.convention("spaced").unwrap();
        assert_eq!(spaced.exact("family name"), Some("family_name"));
        assert_eq!(spaced.exact("TRIBAL NAME"), Some("indian_name"));
        assert_eq!(spaced.exact("Family"), None);
    }

    #[test]
    fn test_partial_lookup_takes_first_label() {
        let short = STUDENTS.convention("short").unwrap();
        assert_eq!(short.partial("Place of birth"), Some("year_of_birth"));
        assert_eq!(short.partial(""), None);
    }

    #[test]
    fn test_convention_lookup_by_name() {
        assert!(STUDENTS.convention(" Positional ").is_some());
        assert!(ORPHANS.convention("camel").is_none());
        assert_eq!(ORPHANS.convention_names(), vec!["spaced", "snake_case"]);
    }
}
