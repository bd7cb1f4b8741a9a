#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use crate::{
        error::{ContextError, ErrorKind},
        identifier::{new_identifier, short_identifier},
        layouting::{invoice_lines, sanitize_lines},
        models::{Customer, Invoice, InvoiceItem, PaymentDetails, Profile},
        number::{
            parse_float, EnglishNumberParser, EuropeanNumberParser, NumberLocale,
            NumberParseError, NumberParser,
        },
        pdf::{
            assemble_single_page_pdf, content_stream, escape_pdf_string, lines_per_page,
            visible_lines_per_page, PdfObject, LINE_HEIGHT, TOP_MARGIN,
        },
    };

    fn sample_profile() -> Profile {
        Profile {
            display_name: "Acme Ltd".into(),
            company_name: "Acme Limited".into(),
            address_line1: "1 Main Street".into(),
            address_line2: String::new(),
            city: "Springfield".into(),
            postal_code: "12345".into(),
            country: "Freedonia".into(),
            email: "billing@acme.test".into(),
            phone: "+1 555 0100".into(),
            tax_id: "FR-998877".into(),
            payment_details: PaymentDetails {
                bank_name: "First Bank".into(),
                iban: "DE89370400440532013000".into(),
                bic: String::new(),
                payment_terms: "Net 30".into(),
            },
            ..Profile::default()
        }
    }

    fn sample_customer() -> Customer {
        Customer {
            display_name: "Jane Doe".into(),
            contact_name: "Jane".into(),
            address_line1: "2 Side Road".into(),
            city: "Shelbyville".into(),
            postal_code: "54321".into(),
            country: "Freedonia".into(),
            email: "jane@doe.test".into(),
            phone: "555 0199".into(),
            ..Customer::default()
        }
    }

    fn sample_invoice() -> Invoice {
        let mut invoice = Invoice {
            number: "INV-20240301-ABCDEF".into(),
            issue_date: datetime!(2024-03-01 0:00 UTC),
            due_date: datetime!(2024-03-31 0:00 UTC),
            items: vec![InvoiceItem::new("Consulting", 2.0, 100.0)],
            tax_rate_percent: 19.0,
            ..Invoice::default()
        };
        invoice.recalculate_totals();
        invoice
    }

    #[test]
    fn parse_numbers_in_both_conventions() {
        assert_eq!(parse_float("1.234,56"), Ok(1234.56));
        assert_eq!(parse_float("1 234,56"), Ok(1234.56));
        assert_eq!(parse_float("1\u{00A0}234,56"), Ok(1234.56));
        assert_eq!(parse_float("1'234,56"), Ok(1234.56));
        assert_eq!(parse_float("1234,56"), Ok(1234.56));
        assert_eq!(parse_float("1234.56"), Ok(1234.56));
        assert_eq!(parse_float("-12,5"), Ok(-12.5));
        assert_eq!(parse_float("+7"), Ok(7.0));
        assert_eq!(parse_float("  42  "), Ok(42.0));
    }

    #[test]
    fn parse_empty_numbers_as_zero() {
        assert_eq!(parse_float(""), Ok(0.0));
        assert_eq!(parse_float("   "), Ok(0.0));
        assert_eq!(parse_float("-"), Ok(0.0));
        assert_eq!(parse_float("'"), Ok(0.0));
    }

    #[test]
    fn reject_malformed_numbers() {
        assert_eq!(
            parse_float("1,2,3"),
            Err(NumberParseError::MultipleDecimalSeparators)
        );
        assert_eq!(
            parse_float("1.2.3"),
            Err(NumberParseError::MultipleDecimalSeparators)
        );
        assert_eq!(
            parse_float("12a"),
            Err(NumberParseError::InvalidCharacter('a'))
        );
        assert_eq!(
            parse_float("--1"),
            Err(NumberParseError::InvalidCharacter('-'))
        );
        assert!(matches!(
            parse_float("."),
            Err(NumberParseError::Malformed { .. })
        ));
    }

    #[test]
    fn european_parser_drops_dots_only_when_a_comma_is_present() {
        assert_eq!(EuropeanNumberParser.parse_float("1.000"), Ok(1.0));
        assert_eq!(EuropeanNumberParser.parse_float("1.000,5"), Ok(1000.5));
        assert_eq!(EuropeanNumberParser.parse_float("1.000.000,25"), Ok(1000000.25));
    }

    #[test]
    fn english_parser_treats_the_comma_as_grouping() {
        assert_eq!(EnglishNumberParser.parse_float("1,234.56"), Ok(1234.56));
        assert_eq!(EnglishNumberParser.parse_float("1,234"), Ok(1234.0));
        assert_eq!(EnglishNumberParser.parse_float("1.234,56"), Ok(1.23456));
        assert_eq!(
            EnglishNumberParser.parse_float("1.2.3"),
            Err(NumberParseError::MultipleDecimalSeparators)
        );
    }

    #[test]
    fn number_locale_selects_the_strategy() {
        assert_eq!(NumberLocale::European.parse_float("1,5"), Ok(1.5));
        assert_eq!(NumberLocale::English.parse_float("1,5"), Ok(15.0));
        assert_eq!(NumberLocale::default(), NumberLocale::European);
    }

    #[test]
    fn parse_errors_become_context_errors() {
        let error: ContextError = NumberParseError::InvalidCharacter('x').into();
        assert_eq!(error.kind, ErrorKind::Parse);
        assert_eq!(
            error.to_string(),
            "Unable to parse the number: invalid numeric character 'x'"
        );
    }

    #[test]
    fn items_from_input_use_the_given_parser() {
        let item =
            InvoiceItem::from_input("Design", "1,5", "1.000,00", &NumberLocale::European).unwrap();
        assert_eq!(item.quantity, 1.5);
        assert_eq!(item.unit_price, 1000.0);
        assert_eq!(item.line_total, 1500.0);

        let error =
            InvoiceItem::from_input("Design", "1,5", "10 EUR", &NumberLocale::European).unwrap_err();
        assert_eq!(error, NumberParseError::InvalidCharacter('E'));
    }

    #[test]
    fn recalculate_totals_of_an_invoice() {
        let invoice = sample_invoice();
        assert_eq!(invoice.subtotal, 200.0);
        assert!((invoice.tax_amount - 38.0).abs() < 1e-9);
        assert!((invoice.total - 238.0).abs() < 1e-9);
    }

    #[test]
    fn recalculate_the_items_before_the_totals() {
        let mut invoice = sample_invoice();
        invoice.items[0].line_total = 0.0;
        invoice.items.push(InvoiceItem {
            description: "Travel".into(),
            quantity: 3.0,
            unit_price: 10.0,
            line_total: 1.0,
        });
        invoice.recalculate_items_and_totals();

        assert_eq!(invoice.items[1].line_total, 30.0);
        assert_eq!(
            invoice.subtotal,
            invoice.items.iter().map(|item| item.quantity * item.unit_price).sum::<f64>()
        );
        assert!((invoice.total - invoice.subtotal - invoice.tax_amount).abs() < 1e-9);
    }

    #[test]
    fn default_number_and_pdf_path_of_an_invoice() {
        let invoice_number = Invoice::default_number(&datetime!(2024-03-01 0:00 UTC));
        assert!(invoice_number.starts_with("INV-20240301-"));
        assert_eq!(invoice_number.len(), "INV-20240301-".len() + 12);

        let pdf_path =
            Invoice::default_pdf_path(std::path::Path::new("data"), "INV-20240301-ABCDEF");
        assert_eq!(
            pdf_path,
            std::path::Path::new("data")
                .join("pdf")
                .join("inv-20240301-abcdef.pdf")
        );
    }

    #[test]
    fn identifiers_are_upper_case_hexadecimal() {
        for (identifier, length) in [(new_identifier(), 32), (short_identifier(), 12)] {
            assert_eq!(identifier.len(), length);
            assert!(identifier
                .chars()
                .all(|character| matches!(character, '0'..='9' | 'A'..='F')));
        }
        assert_ne!(new_identifier(), new_identifier());
    }

    #[test]
    fn lay_out_the_header_of_the_invoice() {
        let lines = invoice_lines(
            &sample_profile(),
            &sample_customer(),
            &sample_invoice(),
            &datetime!(2024-03-05 9:07 UTC),
        );

        similar_asserts::assert_eq!(
            lines[..25].to_vec(),
            vec![
                "Acme Ltd",
                "Acme Limited",
                "1 Main Street",
                " ",
                "12345 Springfield",
                "Freedonia",
                "Email: billing@acme.test",
                "Phone: +1 555 0100",
                "Tax ID: FR-998877",
                " ",
                "Invoice number: INV-20240301-ABCDEF",
                "Issued on: 2024-03-01",
                "Due date: 2024-03-31",
                "Generated on: 2024-03-05 09:07",
                " ",
                "Bill to",
                "Jane Doe",
                "Jane",
                "2 Side Road",
                " ",
                "54321 Shelbyville",
                "Freedonia",
                "Email: jane@doe.test",
                "Phone: 555 0199",
                " ",
            ]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
        );
    }

    #[test]
    fn lay_out_the_items_and_the_totals() {
        let lines = invoice_lines(
            &sample_profile(),
            &sample_customer(),
            &sample_invoice(),
            &datetime!(2024-03-05 9:07 UTC),
        );

        let item_row = lines
            .iter()
            .find(|line| line.starts_with("Consulting"))
            .unwrap();
        assert_eq!(item_row.chars().count(), 40 + 1 + 6 + 1 + 10 + 1 + 12);
        assert_eq!(
            item_row.split_whitespace().collect::<Vec<_>>(),
            vec!["Consulting", "2.00", "100.00", "200.00"]
        );
        assert_eq!(&item_row[40..], "   2.00     100.00       200.00");

        let subtotal_row = lines.iter().find(|line| line.starts_with("Subtotal")).unwrap();
        assert_eq!(subtotal_row.chars().count(), 40 + 1 + 28);
        assert!(subtotal_row.ends_with(" 200.00"));
        // Padded with spaces, unlike the tax identifier of the issuer
        let tax_row = lines.iter().find(|line| line.starts_with("Tax  ")).unwrap();
        assert!(tax_row.ends_with(" 38.00 (19.00%)"));
        let total_row = lines.iter().find(|line| line.starts_with("Total")).unwrap();
        assert_eq!(total_row.chars().count(), 40 + 1 + 28);
        assert!(total_row.ends_with(" 238.00"));
    }

    #[test]
    fn lay_out_notes_and_only_the_filled_payment_details() {
        let mut invoice = sample_invoice();
        invoice.notes = "Thank you!\n\n  Please pay on time.  ".into();
        let lines = invoice_lines(
            &sample_profile(),
            &sample_customer(),
            &invoice,
            &datetime!(2024-03-05 9:07 UTC),
        );

        let notes_index = lines.iter().position(|line| line == "Notes").unwrap();
        similar_asserts::assert_eq!(
            lines[notes_index..].to_vec(),
            vec![
                "Notes",
                "Thank you!",
                " ",
                "Please pay on time.",
                " ",
                "Payment details",
                "Bank: First Bank",
                "IBAN: DE89370400440532013000",
                "Terms: Net 30",
            ]
            .into_iter()
            .map(String::from)
            .collect::<Vec<_>>()
        );
    }

    #[test]
    fn lay_out_an_invoice_without_notes_or_items() {
        let mut invoice = sample_invoice();
        invoice.items.clear();
        invoice.recalculate_totals();
        let lines = invoice_lines(
            &sample_profile(),
            &sample_customer(),
            &invoice,
            &datetime!(2024-03-05 9:07 UTC),
        );

        assert!(!lines.iter().any(|line| line == "Notes"));
        let items_index = lines.iter().position(|line| line == "Items").unwrap();
        // Header, rule and immediately the closing rule
        assert_eq!(lines[items_index + 2], "-".repeat(70));
        assert_eq!(lines[items_index + 3], "-".repeat(70));
        assert!(lines.iter().all(|line| !line.is_empty()));
    }

    #[test]
    fn sanitize_lines_trims_and_fills_blank_lines() {
        let lines = sanitize_lines(vec![
            "  padded  ".into(),
            String::new(),
            "\t".into(),
            // An `e` followed by a combining acute accent is composed into a single character
            "caf\u{0065}\u{0301}".into(),
        ]);
        assert_eq!(lines, vec!["padded", " ", " ", "caf\u{00E9}"]);
    }

    #[test]
    fn escape_only_parentheses_and_backslashes() {
        assert_eq!(escape_pdf_string("plain text"), "plain text");
        assert_eq!(escape_pdf_string("(a)"), "\\(a\\)");
        assert_eq!(escape_pdf_string("C:\\dir"), "C:\\\\dir");
        assert_eq!(escape_pdf_string("\\("), "\\\\\\(");
        assert_eq!(escape_pdf_string("Grüße (€)"), "Grüße \\(€\\)");
    }

    #[test]
    fn build_the_content_stream() {
        let stream = content_stream(&["Hello (world)".to_string(), " ".to_string()]);
        assert_eq!(
            String::from_utf8(stream).unwrap(),
            "BT\n/F1 12.00 Tf\n16.00 TL\n1 0 0 1 56.00 780.00 Tm\n(Hello \\(world\\)) Tj\nT*\n( ) Tj\nT*\nET\n"
        );
    }

    #[test]
    fn number_the_objects_in_enumeration_order() {
        let numbers: Vec<usize> = PdfObject::ALL.iter().map(|object| object.number()).collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
        assert_eq!(PdfObject::Catalog.number(), 1);
        assert_eq!(PdfObject::Contents.number(), 4);
        assert_eq!(PdfObject::Font.number(), 5);
    }

    #[test]
    fn assemble_a_document_with_the_expected_objects() {
        let content = b"BT\nET\n";
        let pdf_document_bytes = assemble_single_page_pdf(content);
        let pdf_document_text = String::from_utf8(pdf_document_bytes).unwrap();

        assert!(pdf_document_text.starts_with("%PDF-1.4\n1 0 obj\n"));
        assert!(pdf_document_text.contains("<< /Type /Catalog /Pages 2 0 R >>"));
        assert!(pdf_document_text.contains("<< /Type /Pages /Kids [3 0 R] /Count 1 >>"));
        assert!(pdf_document_text.contains(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 595.28 841.89] /Contents 4 0 R /Resources << /Font << /F1 5 0 R >> >> >>"
        ));
        assert!(pdf_document_text.contains("4 0 obj\n<< /Length 6 >>\nstream\nBT\nET\nendstream\nendobj\n"));
        assert!(pdf_document_text.contains("<< /Type /Font /Subtype /Type1 /BaseFont /Courier >>"));
        assert!(pdf_document_text.contains("trailer\n<< /Size 6 /Root 1 0 R >>\nstartxref\n"));
        assert!(pdf_document_text.ends_with("%%EOF\n"));
    }

    #[test]
    fn terminate_a_content_stream_without_a_final_newline() {
        let pdf_document_bytes = assemble_single_page_pdf(b"BT ET");
        let pdf_document_text = String::from_utf8(pdf_document_bytes).unwrap();
        assert!(pdf_document_text.contains("<< /Length 5 >>\nstream\nBT ET\nendstream\n"));
    }

    #[test]
    fn page_capacity_follows_the_line_height() {
        assert_eq!(lines_per_page(), 52);

        // The last visible baseline is still on the page, the next one is below it
        let visible_lines = visible_lines_per_page();
        assert_eq!(visible_lines, 49);
        assert!(TOP_MARGIN - (visible_lines - 1) as f64 * LINE_HEIGHT >= 0.0);
        assert!(TOP_MARGIN - visible_lines as f64 * LINE_HEIGHT < 0.0);
    }
}
