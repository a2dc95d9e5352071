//! Identity resolution for schema elements
//!
//! Named elements are identified by `(type, name)`. Unnamed elements such as
//! default constraints borrow their identity from the table and column they
//! hang off; anything else is assumed to occur once per type.

use schemaparity_core::{ElementKey, SchemaElement};

const DEFINING_TABLE: &str = "DefiningTable";
const FOR_COLUMN: &str = "ForColumn";
const DEFINING_COLUMN: &str = "DefiningColumn";

/// Resolve the identity key of an element. Never fails.
pub fn element_key(element: &SchemaElement) -> ElementKey {
    let element_type = element.element_type.as_str();

    if let Some(name) = &element.name {
        return ElementKey::named(element_type, name.as_str());
    }

    if let Some(table) = element.first_reference(DEFINING_TABLE) {
        let discriminator = if let Some(column) = element.first_reference(FOR_COLUMN) {
            format!("{}={},{}={}", DEFINING_TABLE, table, FOR_COLUMN, column)
        } else if let Some(column) = element.first_reference(DEFINING_COLUMN) {
            format!("{}={},{}={}", DEFINING_TABLE, table, DEFINING_COLUMN, column)
        } else {
            format!("{}={}", DEFINING_TABLE, table)
        };
        return ElementKey::composite(element_type, discriminator);
    }

    ElementKey::singleton(element_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemaparity_core::Entry;
    use schemaparity_package::parse_model_document;

    fn parsed_key(element_xml: &str) -> ElementKey {
        let xml = format!(
            r#"<DataSchemaModel xmlns="http://schemas.microsoft.com/sqlserver/dac/Serialization/2012/02"><Model>{}</Model></DataSchemaModel>"#,
            element_xml
        );
        let doc = parse_model_document("model.xml", &xml).unwrap();
        element_key(&doc.elements[0])
    }

    #[test]
    fn named_element() {
        let element = SchemaElement::new("SqlTable").with_name("[dbo].[Foo]");
        assert_eq!(element_key(&element), ElementKey::named("SqlTable", "[dbo].[Foo]"));
    }

    #[test]
    fn name_wins_over_relationships() {
        let element = SchemaElement::new("SqlDefaultConstraint")
            .with_name("[dbo].[DF_Foo]")
            .with_relationship(DEFINING_TABLE, vec![Entry::reference("[dbo].[Foo]")]);
        assert_eq!(
            element_key(&element),
            ElementKey::named("SqlDefaultConstraint", "[dbo].[DF_Foo]")
        );
    }

    #[test]
    fn defining_table_and_for_column() {
        let element = SchemaElement::new("SqlDefaultConstraint")
            .with_relationship(FOR_COLUMN, vec![Entry::reference("[dbo].[T].[C]")])
            .with_relationship(DEFINING_TABLE, vec![Entry::reference("[dbo].[T]")]);

        let key = element_key(&element);
        assert_eq!(
            key,
            ElementKey::composite(
                "SqlDefaultConstraint",
                "DefiningTable=[dbo].[T],ForColumn=[dbo].[T].[C]"
            )
        );
        assert_eq!(
            key.to_string(),
            "SqlDefaultConstraint DefiningTable=[dbo].[T],ForColumn=[dbo].[T].[C]"
        );
    }

    #[test]
    fn defining_table_and_defining_column() {
        let element = SchemaElement::new("SqlExtendedProperty")
            .with_relationship(DEFINING_TABLE, vec![Entry::reference("[dbo].[T]")])
            .with_relationship(DEFINING_COLUMN, vec![Entry::reference("[dbo].[T].[C]")]);
        assert_eq!(
            element_key(&element),
            ElementKey::composite(
                "SqlExtendedProperty",
                "DefiningTable=[dbo].[T],DefiningColumn=[dbo].[T].[C]"
            )
        );
    }

    #[test]
    fn defining_table_alone() {
        let element = SchemaElement::new("SqlPrimaryKeyConstraint")
            .with_relationship(DEFINING_TABLE, vec![Entry::external("[dbo].[T]", "Lib")]);
        assert_eq!(
            element_key(&element),
            ElementKey::composite("SqlPrimaryKeyConstraint", "DefiningTable=[dbo].[T]")
        );
    }

    #[test]
    fn inline_first_entry_does_not_resolve() {
        let element = SchemaElement::new("SqlDatabaseOptions").with_relationship(
            DEFINING_TABLE,
            vec![
                Entry::inline(SchemaElement::new("SqlTable")),
                Entry::reference("[dbo].[T]"),
            ],
        );
        assert_eq!(element_key(&element), ElementKey::singleton("SqlDatabaseOptions"));
    }

    #[test]
    fn singleton_fallback() {
        let element = SchemaElement::new("SqlDatabaseOptions").with_property("Collation", "x");
        let key = element_key(&element);
        assert_eq!(key, ElementKey::singleton("SqlDatabaseOptions"));
        assert_eq!(key.to_string(), "SqlDatabaseOptions");
    }

    #[test]
    fn reference_without_name_does_not_resolve() {
        let key = parsed_key(
            r#"<Element Type="SqlDefaultConstraint">
  <Relationship Name="DefiningTable"><Entry><References /></Entry></Relationship>
</Element>"#,
        );
        assert_eq!(key, ElementKey::singleton("SqlDefaultConstraint"));
    }

    #[test]
    fn only_the_first_entry_is_consulted() {
        let key = parsed_key(
            r#"<Element Type="SqlDefaultConstraint">
  <Relationship Name="DefiningTable">
    <Entry />
    <Entry><References Name="[dbo].[T]" /></Entry>
  </Relationship>
</Element>"#,
        );
        assert_eq!(key, ElementKey::singleton("SqlDefaultConstraint"));
    }

    #[test]
    fn first_relationship_with_a_name_wins() {
        let key = parsed_key(
            r#"<Element Type="SqlDefaultConstraint">
  <Relationship Name="DefiningTable"><Entry><References Name="[dbo].[T]" /></Entry></Relationship>
  <Relationship Name="DefiningTable"><Entry><References Name="[dbo].[U]" /></Entry></Relationship>
</Element>"#,
        );
        assert_eq!(key, ElementKey::composite("SqlDefaultConstraint", "DefiningTable=[dbo].[T]"));
    }
}
