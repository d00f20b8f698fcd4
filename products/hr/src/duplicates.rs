use std::collections::HashMap;

use entity::{Address, DuplicateGroup, Employee};

use crate::normalize::normalize_text;

/// Address compared field by field after normalization. A missing address
/// and an address with no fields normalize to the same value.
#[derive(Debug, Default, PartialEq, Eq)]
struct NormalizedAddress {
    number: Option<String>,
    street: Option<String>,
    postal_code: Option<String>,
    city: Option<String>,
}

impl NormalizedAddress {
    fn of(address: Option<&Address>) -> Self {
        let Some(addr) = address else {
            return Self::default();
        };
        Self {
            number: addr.number.as_ref().and_then(|v| non_blank(&v.to_string())),
            street: addr.street.as_deref().and_then(non_blank),
            postal_code: addr.postal_code.as_ref().and_then(|v| non_blank(&v.to_string())),
            city: addr.city.as_deref().and_then(non_blank),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let normalized = normalize_text(value);
    (!normalized.is_empty()).then_some(normalized)
}

/// Groups employees sharing a normalized `(last, first)` name.
///
/// Only groups with more than one member are returned, in order of first
/// appearance. Records with a blank last or first name are skipped.
pub fn detect_duplicates(employees: &[Employee]) -> Vec<DuplicateGroup> {
    let mut order: Vec<String> = Vec::new();
    let mut members: HashMap<String, Vec<&Employee>> = HashMap::new();

    for emp in employees {
        let last = normalize_text(&emp.last_name);
        let first = normalize_text(&emp.first_name);
        if last.is_empty() || first.is_empty() {
            continue;
        }
        let key = format!("{last}_{first}");
        members
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(emp);
    }

    order
        .into_iter()
        .filter_map(|key| {
            let group = members.remove(&key)?;
            (group.len() > 1).then(|| build_group(key, &group))
        })
        .collect()
}

fn build_group(key: String, group: &[&Employee]) -> DuplicateGroup {
    let reference = NormalizedAddress::of(group[0].address.as_ref());
    let addresses_differ = group[1..]
        .iter()
        .any(|emp| NormalizedAddress::of(emp.address.as_ref()) != reference);

    DuplicateGroup {
        key,
        ids: group.iter().map(|emp| emp.id.clone()).collect(),
        last_names: group.iter().map(|emp| emp.last_name.clone()).collect(),
        first_names: group.iter().map(|emp| emp.first_name.clone()).collect(),
        addresses: group.iter().map(|emp| emp.address.clone()).collect(),
        count: group.len(),
        addresses_differ,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entity::AddressValue;

    fn person(id: &str, last: &str, first: &str, address: Option<Address>) -> Employee {
        Employee {
            id: id.into(),
            last_name: last.into(),
            first_name: first.into(),
            address,
            ..Employee::default()
        }
    }

    fn city(name: &str) -> Option<Address> {
        Some(Address {
            city: Some(name.into()),
            ..Address::default()
        })
    }

    #[test]
    fn same_name_different_city_is_flagged() {
        let employees = vec![
            person("1", "Martin", "Jean", city("Paris")),
            person("2", "Martin", "Jean", city("Lyon")),
        ];
        let groups = detect_duplicates(&employees);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].key, "martin_jean");
        assert_eq!(groups[0].ids, vec!["1", "2"]);
        assert!(groups[0].addresses_differ);
    }

    #[test]
    fn normalized_identical_addresses_are_not_flagged() {
        let a = Address {
            number: Some(AddressValue::from(12_u32)),
            street: Some("Rue  de la Paix".into()),
            postal_code: Some(AddressValue::from("75002")),
            city: Some("PARIS".into()),
        };
        let b = Address {
            number: Some(AddressValue::from("12")),
            street: Some(" rue de la paix".into()),
            postal_code: Some(AddressValue::from(75002_u32)),
            city: Some("Paris ".into()),
        };
        let employees = vec![
            person("1", " martin", "JEAN", Some(a)),
            person("2", "Martin ", "Jean", Some(b)),
        ];
        let groups = detect_duplicates(&employees);
        assert_eq!(groups.len(), 1);
        assert!(!groups[0].addresses_differ);
        assert_eq!(groups[0].last_names, vec![" martin", "Martin "]);
    }

    #[test]
    fn missing_and_empty_addresses_match() {
        let employees = vec![
            person("1", "Roux", "Paul", None),
            person("2", "Roux", "Paul", Some(Address::default())),
        ];
        assert!(!detect_duplicates(&employees)[0].addresses_differ);
    }

    #[test]
    fn singletons_and_blank_names_are_ignored() {
        let employees = vec![
            person("1", "Petit", "Alice", None),
            person("2", "", "Alice", None),
            person("3", "  ", "Alice", None),
            person("4", "Petit", "Alicia", None),
        ];
        assert!(detect_duplicates(&employees).is_empty());
    }

    #[test]
    fn detection_is_idempotent_and_ordered_by_first_appearance() {
        let employees = vec![
            person("1", "Zola", "Emile", city("Paris")),
            person("2", "Blanc", "Louis", city("Lyon")),
            person("3", "Blanc", "Louis", city("Lyon")),
            person("4", "Zola", "Emile", city("Aix")),
            person("5", "Zola", "Emile", city("Paris")),
        ];
        let first = detect_duplicates(&employees);
        let second = detect_duplicates(&employees);
        assert_eq!(first, second);
        assert_eq!(first[0].key, "zola_emile");
        assert_eq!(first[0].count, 3);
        assert!(first[0].addresses_differ);
        assert_eq!(first[1].key, "blanc_louis");
        assert!(!first[1].addresses_differ);
    }
}
