use crate::pdf::PdfDocument;
use anyhow::Result;
use std::path::Path;

pub fn run<P: AsRef<Path>>(path: P) -> Result<()> {
    let doc = PdfDocument::open(&path)?;
    let info = doc.get_info();

    println!("File: {}", path.as_ref().display());
    println!("Pages: {}", info.page_count);

    if let Some(title) = &info.title {
        println!("Title: {}", title);
    }
    if let Some(author) = &info.author {
        println!("Author: {}", author);
    }
    if let Some(creator) = &info.creator {
        println!("Creator: {}", creator);
    }
    if let Some(producer) = &info.producer {
        println!("Producer: {}", producer);
    }
    if let Some(creation_date) = &info.creation_date {
        println!("Created: {}", format_pdf_date(creation_date));
    }
    if let Some(mod_date) = &info.mod_date {
        println!("Modified: {}", format_pdf_date(mod_date));
    }

    Ok(())
}

/// Turn `D:YYYYMMDDHHmmSS...` into `YYYY-MM-DD HH:mm:SS`
fn format_pdf_date(date: &str) -> String {
    let Some(d) = date.strip_prefix("D:") else {
        return date.to_string();
    };
    if d.len() < 8 || !d.bytes().take(8).all(|b| b.is_ascii_digit()) {
        return date.to_string();
    }

    let time = if d.len() >= 14 && d.bytes().take(14).all(|b| b.is_ascii_digit()) {
        format!(" {}:{}:{}", &d[8..10], &d[10..12], &d[12..14])
    } else {
        String::new()
    };
    format!("{}-{}-{}{}", &d[0..4], &d[4..6], &d[6..8], time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_full_date() {
        assert_eq!(
            format_pdf_date("D:20240131124500+09'00'"),
            "2024-01-31 12:45:00"
        );
    }

    #[test]
    fn test_format_date_only() {
        assert_eq!(format_pdf_date("D:20240131"), "2024-01-31");
    }

    #[test]
    fn test_unrecognized_date_passes_through() {
        assert_eq!(format_pdf_date("yesterday"), "yesterday");
        assert_eq!(format_pdf_date("D:2024"), "D:2024");
    }
}
