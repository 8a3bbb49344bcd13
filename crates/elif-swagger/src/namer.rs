/*!
Name assignment for anonymous composites.

Every anonymous keyed composite in a tree receives a derived name built from
the field keys leading to it, camel-cased and concatenated after the root
name. Containers are transparent: they add no path segment. Predicate keys
are never followed.
*/

use crate::schema::{ContainerSchema, Field, ModelName, ObjectSchema, Schema};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicUsize, Ordering};

static PLACEHOLDER_COUNTER: AtomicUsize = AtomicUsize::new(1);

/// Process-unique root name for a schema without one
pub fn placeholder_name(prefix: &str) -> String {
    let id = PLACEHOLDER_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{}{}", camel_case(prefix), id)
}

/// Placeholder root name that is not in `taken`
pub fn fresh_placeholder_name(prefix: &str, taken: &BTreeSet<String>) -> String {
    loop {
        let name = placeholder_name(prefix);
        if !taken.contains(&name) {
            return name;
        }
    }
}

/// Add the intrinsic model names found anywhere in `schema` to `names`.
///
/// Derived names are skipped; they are regenerated on every naming pass.
pub fn intrinsic_names(schema: &Schema, names: &mut BTreeSet<String>) {
    match schema {
        Schema::Object(object) => {
            if let Some(name) = object.name.as_ref().filter(|name| name.is_intrinsic()) {
                names.insert(name.as_str().to_string());
            }
            for field in &object.fields {
                intrinsic_names(&field.schema, names);
            }
        }
        Schema::Container(container) => intrinsic_names(&container.item, names),
        Schema::Leaf(_) => {}
    }
}

/// Camel-case one path segment: `owner_id` and `owner-id` become `OwnerId`
pub fn camel_case(segment: &str) -> String {
    segment
        .split(|c: char| !c.is_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Derived name for a path, root segment first
pub fn full_name(path: &[String]) -> String {
    path.iter().map(|segment| camel_case(segment)).collect()
}

/// Return a copy of `schema` in which every anonymous composite carries a
/// derived name, rooted at `root_name`.
///
/// The root keeps its own name when it has one. A nested composite that is
/// already named keeps its name, and its anonymous children are named from
/// that name instead of the outer path.
pub fn assign_names(schema: &Schema, root_name: &str) -> Schema {
    let mut path = vec![root_name.to_string()];
    name_schema(schema, &mut path)
}

/// Name a root schema, generating a placeholder root name when it has none.
///
/// A container root is looked through, so `[Pet]` is rooted at `Pet`.
pub fn name_root(schema: &Schema, placeholder_prefix: &str) -> Schema {
    name_root_avoiding(schema, placeholder_prefix, &BTreeSet::new())
}

/// Like [`name_root`], but a generated root name never equals one of `taken`
pub fn name_root_avoiding(schema: &Schema, placeholder_prefix: &str, taken: &BTreeSet<String>) -> Schema {
    let root_name = schema
        .peek()
        .name()
        .map(str::to_string)
        .unwrap_or_else(|| fresh_placeholder_name(placeholder_prefix, taken));
    assign_names(schema, &root_name)
}

/// Name all anonymous sub-schemas of a schema
pub fn with_named_sub_schemas(schema: &Schema) -> Schema {
    name_root(schema, "schema")
}

fn name_schema(schema: &Schema, path: &mut Vec<String>) -> Schema {
    match schema {
        Schema::Object(object) => Schema::Object(name_object(object, path)),
        Schema::Container(container) => Schema::Container(ContainerSchema {
            kind: container.kind,
            item: Box::new(name_schema(&container.item, path)),
        }),
        Schema::Leaf(_) => schema.clone(),
    }
}

fn name_object(object: &ObjectSchema, path: &mut Vec<String>) -> ObjectSchema {
    let name = match &object.name {
        Some(existing) if path.len() > 1 => {
            let mut own_path = vec![existing.as_str().to_string()];
            return ObjectSchema {
                name: Some(existing.clone()),
                description: object.description.clone(),
                fields: name_fields(&object.fields, &mut own_path),
            };
        }
        Some(existing) => existing.clone(),
        None => ModelName::Derived(full_name(path)),
    };

    ObjectSchema {
        name: Some(name),
        description: object.description.clone(),
        fields: name_fields(&object.fields, path),
    }
}

fn name_fields(fields: &[Field], path: &mut Vec<String>) -> Vec<Field> {
    fields
        .iter()
        .map(|field| match field.key.name() {
            Some(key) => {
                path.push(key.to_string());
                let schema = name_schema(&field.schema, path);
                path.pop();
                Field {
                    key: field.key.clone(),
                    schema,
                    description: field.description.clone(),
                }
            }
            None => field.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{LeafSchema, PredicateKey};

    fn field_schema<'a>(object: &'a ObjectSchema, key: &str) -> &'a Schema {
        &object
            .fields
            .iter()
            .find(|f| f.key.name() == Some(key))
            .unwrap()
            .schema
    }

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("inner"), "Inner");
        assert_eq!(camel_case("owner_id"), "OwnerId");
        assert_eq!(camel_case("owner-id"), "OwnerId");
        assert_eq!(camel_case("Pet"), "Pet");
        assert_eq!(full_name(&["Root".into(), "inner".into(), "value".into()]), "RootInnerValue");
    }

    #[test]
    fn test_nested_anonymous_named_by_path() {
        let root = Schema::from(ObjectSchema::new().required(
            "inner",
            ObjectSchema::new().required("value", LeafSchema::String),
        ));

        let named = assign_names(&root, "Root");
        let root_object = named.as_object().unwrap();
        assert_eq!(root_object.name(), Some("Root"));
        assert_eq!(field_schema(root_object, "inner").name(), Some("RootInner"));
    }

    #[test]
    fn test_containers_add_no_segment() {
        let element = ObjectSchema::new().required("id", LeafSchema::Long);
        let in_sequence = Schema::from(ObjectSchema::new().required("items", Schema::sequence(element.clone())));
        let bare = Schema::from(ObjectSchema::new().required("items", element));

        let from_sequence = assign_names(&in_sequence, "Order");
        let from_bare = assign_names(&bare, "Order");

        let sequence_item = field_schema(from_sequence.as_object().unwrap(), "items").peek();
        let bare_item = field_schema(from_bare.as_object().unwrap(), "items");
        assert_eq!(sequence_item.name(), Some("OrderItems"));
        assert_eq!(sequence_item, bare_item);
    }

    #[test]
    fn test_empty_root_still_named() {
        let named = assign_names(&Schema::from(ObjectSchema::new()), "Body7");
        assert_eq!(named.name(), Some("Body7"));
    }

    #[test]
    fn test_naming_is_deterministic() {
        let root = Schema::from(
            ObjectSchema::new()
                .required("a", ObjectSchema::new().optional("b", ObjectSchema::new()))
                .optional("c", Schema::set(ObjectSchema::new().required("d", LeafSchema::Int))),
        );

        assert_eq!(assign_names(&root, "Root"), assign_names(&root, "Root"));
    }

    #[test]
    fn test_named_nested_keeps_name_and_names_its_children() {
        let tag = ObjectSchema::named("Tag").required("meta", ObjectSchema::new().required("k", LeafSchema::String));
        let pet = Schema::from(ObjectSchema::named("Pet").required("tag", tag));

        let named = assign_names(&pet, "Pet");
        let tag = field_schema(named.as_object().unwrap(), "tag").as_object().unwrap();
        assert_eq!(tag.name, Some(ModelName::Intrinsic("Tag".into())));
        assert_eq!(field_schema(tag, "meta").name(), Some("TagMeta"));
    }

    #[test]
    fn test_predicate_values_are_not_named() {
        let root = Schema::from(ObjectSchema::new().predicate(
            PredicateKey::AnyKeyword,
            ObjectSchema::new().required("x", LeafSchema::Int),
        ));

        let named = assign_names(&root, "Root");
        assert_eq!(named.as_object().unwrap().fields[0].schema.name(), None);
    }

    #[test]
    fn test_name_root_uses_element_name_of_container() {
        let pets = Schema::sequence(ObjectSchema::named("Pet"));
        assert_eq!(name_root(&pets, "body").peek().name(), Some("Pet"));

        let anonymous = name_root(&Schema::from(ObjectSchema::new()), "body");
        assert!(anonymous.name().unwrap().starts_with("Body"));
    }

    #[test]
    fn test_placeholders_are_unique() {
        assert_ne!(placeholder_name("schema"), placeholder_name("schema"));
    }

    #[test]
    fn test_fresh_placeholder_skips_taken_names() {
        let first = placeholder_name("reserved");
        let start: usize = first.trim_start_matches("Reserved").parse().unwrap();
        let taken: BTreeSet<String> = (start + 1..=start + 100).map(|n| format!("Reserved{}", n)).collect();

        let fresh = fresh_placeholder_name("reserved", &taken);
        let number: usize = fresh.trim_start_matches("Reserved").parse().unwrap();
        assert!(number > start + 100);

        let named = name_root_avoiding(&Schema::from(ObjectSchema::new()), "reserved", &taken);
        assert!(!taken.contains(named.name().unwrap()));
    }

    #[test]
    fn test_intrinsic_names_skip_derived() {
        let named = assign_names(
            &Schema::from(
                ObjectSchema::named("Order")
                    .required("meta", ObjectSchema::new())
                    .required("lines", Schema::sequence(ObjectSchema::named("Line"))),
            ),
            "Order",
        );

        let mut names = BTreeSet::new();
        intrinsic_names(&named, &mut names);
        assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["Line", "Order"]);
    }
}
