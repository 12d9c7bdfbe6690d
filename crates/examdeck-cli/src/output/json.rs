use examdeck_core::error::ExamDeckError;
use serde::Serialize;

pub fn print<T: Serialize>(value: &T) -> Result<(), ExamDeckError> {
    println!("{}", to_string(value)?);
    Ok(())
}

pub fn to_string<T: Serialize>(value: &T) -> Result<String, ExamDeckError> {
    Ok(serde_json::to_string_pretty(value)?)
}
