use crate::model::{BeneficiaryRecord, Token};

/// Result of grouping a token stream into records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assembly {
    /// Records in the order their guide numbers appeared.
    pub records: Vec<BeneficiaryRecord>,
    /// Tokens seen before the first guide number. They belong to no record.
    pub orphaned: Vec<Token>,
}

enum State {
    NoActiveRecord,
    BuildingRecord(BeneficiaryRecord),
}

/// Group tokens into beneficiary records.
///
/// Every `GuideNumber` token closes the record being built and opens a new
/// one. Other tokens fill fields of the open record; a repeated field keeps
/// the last value. Tokens arriving before any guide number are dropped and
/// reported in [`Assembly::orphaned`].
pub fn assemble<I>(tokens: I) -> Assembly
where
    I: IntoIterator<Item = Token>,
{
    let mut out = Assembly::default();
    let mut state = State::NoActiveRecord;

    for token in tokens {
        state = match (state, token) {
            (state, Token::GuideNumber(number)) => {
                if let State::BuildingRecord(record) = state {
                    emit(&mut out.records, record);
                }
                State::BuildingRecord(BeneficiaryRecord {
                    guide_number: Some(number),
                    ..Default::default()
                })
            }
            (State::NoActiveRecord, token) => {
                out.orphaned.push(token);
                State::NoActiveRecord
            }
            (State::BuildingRecord(mut record), token) => {
                apply(&mut record, token);
                State::BuildingRecord(record)
            }
        };
    }

    if let State::BuildingRecord(record) = state {
        emit(&mut out.records, record);
    }

    out
}

fn apply(record: &mut BeneficiaryRecord, token: Token) {
    match token {
        Token::GuideNumber(v) => record.guide_number = Some(v),
        Token::DentistIdentifier(v) => record.dentist = Some(v),
        Token::BeneficiaryName(v) => record.beneficiary_name = Some(v),
        Token::GuideAmount(v) => record.guide_amount_raw = Some(v),
    }
}

fn emit(records: &mut Vec<BeneficiaryRecord>, record: BeneficiaryRecord) {
    if !record.is_empty() {
        records.push(record);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guide(n: &str) -> Token {
        Token::GuideNumber(n.into())
    }

    fn dentist(n: &str) -> Token {
        Token::DentistIdentifier(n.into())
    }

    fn name(n: &str) -> Token {
        Token::BeneficiaryName(n.into())
    }

    fn amount(n: &str) -> Token {
        Token::GuideAmount(n.into())
    }

    #[test]
    fn test_single_complete_record() {
        let a = assemble(vec![
            guide("123456789"),
            dentist("Dr. Silva"),
            name("João Souza"),
            amount("1.500,00"),
        ]);
        assert_eq!(
            a.records,
            vec![BeneficiaryRecord {
                guide_number: Some("123456789".into()),
                dentist: Some("Dr. Silva".into()),
                beneficiary_name: Some("João Souza".into()),
                guide_amount_raw: Some("1.500,00".into()),
            }]
        );
        assert!(a.orphaned.is_empty());
    }

    #[test]
    fn test_guide_number_starts_new_record() {
        let a = assemble(vec![
            guide("111111111"),
            name("Ana"),
            guide("222222222"),
            name("Bruno"),
            amount("5,00"),
        ]);
        assert_eq!(a.records.len(), 2);
        assert_eq!(a.records[0].beneficiary_name.as_deref(), Some("Ana"));
        assert_eq!(a.records[0].guide_amount_raw, None);
        assert_eq!(a.records[1].guide_number.as_deref(), Some("222222222"));
        assert_eq!(a.records[1].guide_amount_raw.as_deref(), Some("5,00"));
    }

    #[test]
    fn test_record_count_equals_guide_number_count() {
        let tokens = vec![
            guide("1"),
            guide("2"),
            name("x"),
            guide("3"),
            amount("1,00"),
            guide("2"),
        ];
        let guides = tokens.iter().filter(|t| matches!(t, Token::GuideNumber(_))).count();
        assert_eq!(assemble(tokens).records.len(), guides);
    }

    #[test]
    fn test_tokens_before_first_guide_are_dropped() {
        let a = assemble(vec![
            dentist("Dr. Early"),
            amount("9,99"),
            guide("123456789"),
            name("Ana"),
        ]);
        assert_eq!(a.records.len(), 1);
        assert_eq!(a.records[0].dentist, None);
        assert_eq!(a.records[0].guide_amount_raw, None);
        assert_eq!(a.orphaned, vec![dentist("Dr. Early"), amount("9,99")]);
    }

    #[test]
    fn test_repeated_field_last_write_wins() {
        let a = assemble(vec![guide("1"), name("First"), name("Second")]);
        assert_eq!(a.records[0].beneficiary_name.as_deref(), Some("Second"));
    }

    #[test]
    fn test_empty_stream() {
        let a = assemble(Vec::new());
        assert!(a.records.is_empty());
        assert!(a.orphaned.is_empty());
    }

    #[test]
    fn test_no_guide_numbers_yields_no_records() {
        let a = assemble(vec![name("Ana"), amount("1,00")]);
        assert!(a.records.is_empty());
        assert_eq!(a.orphaned.len(), 2);
    }
}
