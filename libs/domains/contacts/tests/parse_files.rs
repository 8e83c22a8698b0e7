//! End-to-end parsing of contact files

use domain_contacts::{Contact, Field, ParseError, parse, try_parse};

const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

fn fixture(name: &str) -> Vec<u8> {
    std::fs::read(format!("{}/{}", FIXTURES, name)).expect("fixture should exist")
}

mod csv_tests {
    use super::*;

    #[test]
    fn test_mixed_rows_keep_valid_ones() {
        let csv = "email,name,description\na@x.com,Alice,Hi\nbad,Bob,Hey\n,Carl,Yo";

        let outcome = parse(csv.as_bytes(), "contacts.csv");

        assert_eq!(
            outcome.records,
            vec![Contact::new("a@x.com", "Alice", "Hi").unwrap()]
        );
        assert_eq!(
            outcome.diagnostics,
            vec!["Row 3: invalid email (bad)", "Row 4: empty email"]
        );
    }

    #[test]
    fn test_header_only_file_is_insufficient() {
        let outcome = parse(b"email,name,description\n", "contacts.csv");

        assert!(outcome.is_total_failure());
        assert_eq!(
            outcome.diagnostics,
            vec![ParseError::InsufficientRows.to_string()]
        );
    }

    #[test]
    fn test_missing_description_column_rejects_file() {
        let csv = "email,name,notes\na@x.com,Alice,Hi\nb@x.com,Bob,Hey\n";

        let outcome = parse(csv.as_bytes(), "contacts.csv");

        assert!(outcome.records.is_empty());
        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(outcome.diagnostics[0].contains("description"));
        for synonym in Field::Description.synonyms() {
            assert!(outcome.diagnostics[0].contains(synonym));
        }
    }

    #[test]
    fn test_spanish_headers_in_any_order() {
        let csv = "Mensaje,Correo Electrónico,Nombre\nBienvenida,ana@example.com,Ana\n";

        let outcome = parse(csv.as_bytes(), "CONTACTOS.CSV");

        assert!(outcome.diagnostics.is_empty());
        let contact = &outcome.records[0];
        assert_eq!(contact.email(), "ana@example.com");
        assert_eq!(contact.name(), "Ana");
        assert_eq!(contact.description(), "Bienvenida");
    }

    #[test]
    fn test_diagnostics_do_not_renumber_after_skips() {
        let csv = "email,name,description\n\
                   bad-1,A,x\n\
                   ok1@x.com,B,x\n\
                   bad-2,C,x\n\
                   ok2@x.com,D,x\n";

        let outcome = try_parse(csv.as_bytes(), "contacts.csv").unwrap();

        let names: Vec<&str> = outcome.records.iter().map(Contact::name).collect();
        assert_eq!(names, vec!["B", "D"]);
        assert_eq!(
            outcome.diagnostics,
            vec!["Row 2: invalid email (bad-1)", "Row 4: invalid email (bad-2)"]
        );
    }

    #[test]
    fn test_blank_lines_keep_file_row_numbers() {
        let outcome = parse(b"email,name,description\n\nbad,Bob,Hey\n", "contacts.csv");
        assert_eq!(outcome.diagnostics, vec!["Row 3: invalid email (bad)"]);

        let csv = "email,name,description\n\
                   a@x.com,Alice,Hi\n\
                   \n\
                   \n\
                   ,Carl,Yo\n";
        let outcome = parse(csv.as_bytes(), "contacts.csv");
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.diagnostics, vec!["Row 5: empty email"]);
    }
}

mod spreadsheet_tests {
    use super::*;

    #[test]
    fn test_first_sheet_only() {
        let outcome = parse(&fixture("contacts.xlsx"), "contacts.xlsx");

        let emails: Vec<&str> = outcome.records.iter().map(Contact::email).collect();
        assert_eq!(emails, vec!["ana@example.com", "carla@example.com"]);
        assert_eq!(outcome.records[0].name(), "Ana Pérez");
        assert_eq!(outcome.records[1].description(), "2024");
        assert_eq!(
            outcome.diagnostics,
            vec!["Row 3: invalid email (not-an-email)"]
        );
    }

    #[test]
    fn test_empty_sheet() {
        let err = try_parse(&fixture("empty_sheet.xlsx"), "empty.xlsx").unwrap_err();
        assert_eq!(err, ParseError::EmptySheet);
    }

    #[test]
    fn test_workbook_without_sheets() {
        let err = try_parse(&fixture("no_sheets.xlsx"), "no_sheets.xlsx").unwrap_err();
        assert_eq!(err, ParseError::NoSheets);

        let outcome = parse(&fixture("no_sheets.xlsx"), "no_sheets.xlsx");
        assert_eq!(
            outcome.diagnostics,
            vec!["The spreadsheet does not contain any worksheets"]
        );
    }

    #[test]
    fn test_csv_bytes_with_excel_extension() {
        let outcome = parse(b"email,name,description\na@x.com,A,B\n", "contacts.xlsx");

        assert!(outcome.is_total_failure());
        assert!(outcome.diagnostics[0].starts_with("Failed to read spreadsheet"));
    }
}
