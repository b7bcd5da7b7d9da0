use serde::{Deserialize, Deserializer, Serialize};

/// Skill tags as accepted at the HTTP boundary.
///
/// Clients send either a JSON array (`["React", "Go"]`) or a single
/// comma-separated string (`"React, Go"`, what HTML forms produce). Both are
/// normalized here: entries trimmed, empties dropped, exact duplicates removed
/// keeping the first occurrence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SkillList(Vec<String>);

impl SkillList {
    pub fn parse_delimited(raw: &str) -> Self {
        Self::from_iter(raw.split(','))
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl<S: AsRef<str>> FromIterator<S> for SkillList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut out: Vec<String> = Vec::new();
        for raw in iter {
            let skill = raw.as_ref().trim();
            if skill.is_empty() || out.iter().any(|s| s == skill) {
                continue;
            }
            out.push(skill.to_string());
        }
        SkillList(out)
    }
}

impl From<SkillList> for Vec<String> {
    fn from(list: SkillList) -> Self {
        list.0
    }
}

impl<'de> Deserialize<'de> for SkillList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            List(Vec<String>),
            Delimited(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::List(items) => SkillList::from_iter(items),
            Raw::Delimited(s) => SkillList::parse_delimited(&s),
        })
    }
}
