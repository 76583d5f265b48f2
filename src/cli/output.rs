//! Output formatting utilities for CLI operations.

use std::io::{self, Write};

use boathouse::{BoatRecord, BoatTypeFilter, DataError, RecordId, ReviewRecord};

/// Writes the boat list for `filter` to the given writer.
pub fn write_boats_to<W: Write>(
    writer: &mut W,
    filter: &BoatTypeFilter,
    boats: &[BoatRecord],
) -> Result<(), DataError> {
    writeln!(writer, "Boats ({}):", filter.label()).map_err(|e| io_error(&e))?;

    if boats.is_empty() {
        writeln!(writer, "  (no boats found)").map_err(|e| io_error(&e))?;
        return Ok(());
    }

    for boat in boats {
        writeln!(
            writer,
            "  {} [{}] length {}, price {}",
            boat.name,
            boat.id,
            optional_number(boat.length),
            optional_number(boat.price)
        )
        .map_err(|e| io_error(&e))?;
    }
    Ok(())
}

/// Writes the reviews of one boat to the given writer.
pub fn write_reviews_to<W: Write>(
    writer: &mut W,
    boat_id: &RecordId,
    reviews: &[ReviewRecord],
) -> Result<(), DataError> {
    writeln!(writer, "Reviews for {boat_id}:").map_err(|e| io_error(&e))?;

    if reviews.is_empty() {
        writeln!(writer, "  (no reviews yet)").map_err(|e| io_error(&e))?;
        return Ok(());
    }

    for review in reviews {
        let title = review.title.as_deref().unwrap_or("(untitled)");
        let author = review.reviewer_name().unwrap_or("unknown");
        let rating = review
            .rating
            .map_or_else(|| "-".to_owned(), |stars| format!("{stars}/5"));
        writeln!(writer, "  {title} ({rating}) by {author}").map_err(|e| io_error(&e))?;
        if let Some(comment) = review.comment.as_deref() {
            writeln!(writer, "    {comment}").map_err(|e| io_error(&e))?;
        }
    }
    Ok(())
}

fn optional_number(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_owned(), |number| number.to_string())
}

fn io_error(error: &io::Error) -> DataError {
    DataError::Io {
        message: error.to_string(),
    }
}
