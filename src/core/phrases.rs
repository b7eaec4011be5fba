//! # Phrases
//!
//! Turns engine outcomes into the sentences shown in the description panel
//! and spoken by the narrator. Two locales: pt-BR (the default) and
//! English. Pure string building, no state.
//!
//! Descriptions use written arithmetic ("4 + 6 = 10"); narration spells the
//! operators out ("4 mais 6") because that is what gets read aloud.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::catalog::Exercise;
use crate::core::digits::Column;
use crate::core::engine::{ColumnSum, StepOutcome};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Locale {
    #[default]
    PtBr,
    En,
}

impl Locale {
    /// BCP-47 tag handed to the narration collaborator.
    pub fn tag(self) -> &'static str {
        match self {
            Locale::PtBr => "pt-BR",
            Locale::En => "en-US",
        }
    }

    pub fn column_name(self, column: Column) -> &'static str {
        match (self, column) {
            (Locale::PtBr, Column::Units) => "unidades",
            (Locale::PtBr, Column::Tens) => "dezenas",
            (Locale::PtBr, Column::Hundreds) => "centenas",
            (Locale::En, Column::Units) => "units",
            (Locale::En, Column::Tens) => "tens",
            (Locale::En, Column::Hundreds) => "hundreds",
        }
    }

    fn plus(self) -> &'static str {
        match self {
            Locale::PtBr => "mais",
            Locale::En => "plus",
        }
    }
}

/// `4 + 6` for units, `4 + 5 + 1` once a carry feeds the column.
fn written_terms(sum: &ColumnSum) -> String {
    if sum.column == Column::Units {
        format!("{} + {}", sum.d1, sum.d2)
    } else {
        format!("{} + {} + {}", sum.d1, sum.d2, sum.carry_in)
    }
}

/// Spoken form of the same terms.
fn spoken_terms(locale: Locale, sum: &ColumnSum) -> String {
    let plus = locale.plus();
    if sum.column == Column::Units {
        format!("{} {plus} {}", sum.d1, sum.d2)
    } else {
        format!("{} {plus} {} {plus} {}", sum.d1, sum.d2, sum.carry_in)
    }
}

/// Description-panel text for a step outcome. `result` is the exercise's
/// expected total, used only in the final sentence.
pub fn describe_step(locale: Locale, outcome: &StepOutcome, result: u16) -> String {
    match outcome {
        StepOutcome::Announced(sum) => {
            let name = locale.column_name(sum.column);
            let terms = written_terms(sum);
            match locale {
                Locale::PtBr => format!("Some as {name}: {terms} = {}", sum.sum),
                Locale::En => format!("Add the {name}: {terms} = {}", sum.sum),
            }
        }
        StepOutcome::Resolved { sum, digit, carry } => {
            let terms = written_terms(sum);
            match sum.column.carry_target() {
                Some(target) if *carry > 0 => {
                    let target_name = locale.column_name(target);
                    match locale {
                        Locale::PtBr => format!(
                            "Como {terms} = {}, escrevemos {digit} e vai {carry} para as {target_name}",
                            sum.sum
                        ),
                        Locale::En => format!(
                            "Since {terms} = {}, write {digit} and carry {carry} to the {target_name}",
                            sum.sum
                        ),
                    }
                }
                Some(_) => {
                    let name = locale.column_name(sum.column);
                    match locale {
                        Locale::PtBr => format!(
                            "Como {terms} = {}, escrevemos {digit} como resultado das {name}",
                            sum.sum
                        ),
                        Locale::En => format!(
                            "Since {terms} = {}, write {digit} in the {name} column",
                            sum.sum
                        ),
                    }
                }
                None => match locale {
                    Locale::PtBr => format!(
                        "Como {terms} = {}, escrevemos {digit}. Resultado final: {result}",
                        sum.sum
                    ),
                    Locale::En => format!(
                        "Since {terms} = {}, write {digit}. Final result: {result}",
                        sum.sum
                    ),
                },
            }
        }
        StepOutcome::AlreadyComplete => already_complete(locale),
    }
}

/// Sentence sent to the narrator for a step outcome.
pub fn narrate_step(locale: Locale, outcome: &StepOutcome, result: u16) -> String {
    match outcome {
        StepOutcome::Announced(sum) => {
            let name = locale.column_name(sum.column);
            let terms = spoken_terms(locale, sum);
            match locale {
                Locale::PtBr => format!("Some as {name}: {terms}"),
                Locale::En => format!("Add the {name}: {terms}"),
            }
        }
        StepOutcome::Resolved { sum, digit, carry } => {
            let terms = spoken_terms(locale, sum);
            let is_final = sum.column.carry_target().is_none();
            match locale {
                Locale::PtBr => {
                    let mut text = format!("{terms} é {}. Escreve {digit}", sum.sum);
                    if *carry > 0 {
                        text.push_str(&format!(" e sobe {carry}"));
                    }
                    if is_final {
                        text.push_str(&format!(". Resultado final: {result}"));
                    }
                    text
                }
                Locale::En => {
                    let mut text = format!("{terms} is {}. Write {digit}", sum.sum);
                    if *carry > 0 {
                        text.push_str(&format!(" and carry {carry}"));
                    }
                    if is_final {
                        text.push_str(&format!(". Final result: {result}"));
                    }
                    text
                }
            }
        }
        StepOutcome::AlreadyComplete => already_complete(locale),
    }
}

/// Shown (and spoken) when navigating to an exercise. `position` is 1-based.
pub fn exercise_intro(locale: Locale, position: usize, total: usize, exercise: Exercise) -> String {
    match locale {
        Locale::PtBr => format!(
            "Exercício {position} de {total}: {} + {}",
            exercise.num1, exercise.num2
        ),
        Locale::En => format!(
            "Exercise {position} of {total}: {} + {}",
            exercise.num1, exercise.num2
        ),
    }
}

pub fn narrate_intro(locale: Locale, position: usize, exercise: Exercise) -> String {
    match locale {
        Locale::PtBr => format!(
            "Exercício {position}. {} mais {}",
            exercise.num1, exercise.num2
        ),
        Locale::En => format!(
            "Exercise {position}. {} plus {}",
            exercise.num1, exercise.num2
        ),
    }
}

pub fn already_complete(locale: Locale) -> String {
    match locale {
        Locale::PtBr => "Exercício já concluído".to_string(),
        Locale::En => "Exercise already complete".to_string(),
    }
}

pub fn reset_message(locale: Locale) -> String {
    match locale {
        Locale::PtBr => "Exercício reiniciado".to_string(),
        Locale::En => "Exercise reset".to_string(),
    }
}

pub fn solved_all(locale: Locale) -> String {
    match locale {
        Locale::PtBr => "Resolvido automaticamente".to_string(),
        Locale::En => "All exercises solved".to_string(),
    }
}

pub fn narration_toggled(locale: Locale, enabled: bool) -> String {
    match (locale, enabled) {
        (Locale::PtBr, true) => "Áudio ativado".to_string(),
        (Locale::PtBr, false) => "Áudio desativado".to_string(),
        (Locale::En, true) => "Narration on".to_string(),
        (Locale::En, false) => "Narration off".to_string(),
    }
}

pub fn start_prompt(locale: Locale) -> &'static str {
    match locale {
        Locale::PtBr => "Pressione espaço para começar",
        Locale::En => "Press space to begin",
    }
}

/// One hint per column, in resolution order, for the hint panel.
pub fn hints(locale: Locale) -> [&'static str; 3] {
    match locale {
        Locale::PtBr => [
            "Unidades: some os algarismos das unidades. Se der 10 ou mais, escreva só a unidade e suba 1.",
            "Dezenas: some as dezenas e o que subiu das unidades.",
            "Centenas: some as centenas e o que subiu das dezenas.",
        ],
        Locale::En => [
            "Units: add the units digits. If you get 10 or more, write only the unit and carry 1.",
            "Tens: add the tens plus whatever carried over from the units.",
            "Hundreds: add the hundreds plus whatever carried over from the tens.",
        ],
    }
}
