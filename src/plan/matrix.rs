use indexmap::IndexMap;
use serde_yaml::Value;
use thiserror::Error;

/// One assignment of values to a job's matrix dimensions.
pub type Combination = IndexMap<String, Value>;

#[derive(Error, Debug)]
pub enum MatrixError {
    #[error("matrix must be a mapping, got {0}")]
    NotAMapping(String),

    #[error("matrix dimension `{0}` must be a list of values")]
    NotAList(String),

    #[error("matrix dimension `{0}` does not contain any values")]
    EmptyDimension(String),

    #[error("matrix `{0}` entries must be mappings")]
    InvalidEntry(&'static str),
}

/// Expands a `strategy.matrix` value into its combinations.
///
/// Dimensions are multiplied in declaration order with the last one varying
/// fastest. `exclude` entries drop every combination they fully match;
/// `include` entries extend every product combination they do not contradict
/// and are appended on their own when they extend none.
pub fn expand(matrix: &Value) -> Result<Vec<Combination>, MatrixError> {
    let Value::Mapping(mapping) = matrix else {
        return Err(MatrixError::NotAMapping(stringify_value(matrix)));
    };

    let mut dimensions: Vec<(String, &[Value])> = Vec::new();
    let mut include = Vec::new();
    let mut exclude = Vec::new();

    for (key, value) in mapping {
        let key = stringify_value(key);
        if key == "include" {
            include = entries(value, "include")?;
        } else if key == "exclude" {
            exclude = entries(value, "exclude")?;
        } else {
            match value {
                Value::Sequence(values) if values.is_empty() => {
                    return Err(MatrixError::EmptyDimension(key));
                }
                Value::Sequence(values) => dimensions.push((key, values.as_slice())),
                _ => return Err(MatrixError::NotAList(key)),
            }
        }
    }

    let mut combinations = product(&dimensions);
    combinations.retain(|combination| !exclude.iter().any(|entry| matches(combination, entry)));

    // Entries appended below stand alone; later entries never extend them
    let original = combinations.len();
    for entry in include {
        let mut extended = false;
        for combination in &mut combinations[..original] {
            let contradicts = dimensions.iter().any(|(name, _)| {
                match (entry.get(name), combination.get(name)) {
                    (Some(wanted), Some(actual)) => !same_value(wanted, actual),
                    _ => false,
                }
            });
            if contradicts {
                continue;
            }
            for (key, value) in &entry {
                if !dimensions.iter().any(|(name, _)| name == key) {
                    combination.insert(key.clone(), value.clone());
                }
            }
            extended = true;
        }
        if !extended {
            combinations.push(entry);
        }
    }

    Ok(combinations)
}

/// Canonical display form of a matrix value.
///
/// Scalars print as written, null as an empty string, and nested
/// sequences or mappings as compact JSON.
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Tagged(tagged) => stringify_value(&tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => serde_json::to_string(value)
            .or_else(|_| serde_yaml::to_string(value).map(|s| s.trim_end().to_string()))
            .unwrap_or_default(),
    }
}

fn product(dimensions: &[(String, &[Value])]) -> Vec<Combination> {
    if dimensions.is_empty() {
        return Vec::new();
    }
    dimensions
        .iter()
        .fold(vec![Combination::new()], |acc, (name, values)| {
            acc.iter()
                .flat_map(|partial| {
                    values.iter().map(move |value| {
                        let mut combination = partial.clone();
                        combination.insert(name.clone(), value.clone());
                        combination
                    })
                })
                .collect()
        })
}

fn entries(value: &Value, section: &'static str) -> Result<Vec<Combination>, MatrixError> {
    let Value::Sequence(items) = value else {
        return Err(MatrixError::InvalidEntry(section));
    };
    items
        .iter()
        .map(|item| match item {
            Value::Mapping(mapping) => Ok(mapping
                .iter()
                .map(|(k, v)| (stringify_value(k), v.clone()))
                .collect()),
            _ => Err(MatrixError::InvalidEntry(section)),
        })
        .collect()
}

fn matches(combination: &Combination, entry: &Combination) -> bool {
    entry.iter().all(|(key, wanted)| {
        combination
            .get(key)
            .is_some_and(|actual| same_value(wanted, actual))
    })
}

fn same_value(a: &Value, b: &Value) -> bool {
    stringify_value(a) == stringify_value(b)
}
