//! Reference Stunting Rule Base
//!
//! Default height/weight rule base: 6 rules over 3 output categories.
//! Values are configuration, kept here as data.
//!
//! | variable        | label            | shape                       |
//! |-----------------|------------------|-----------------------------|
//! | height_for_age  | very_short       | trapezoidal(-5,-5,-3.1,-2.9)|
//! |                 | short            | triangular(-3.1,-2.5,-1.9)  |
//! |                 | normal           | trapezoidal(-2.1,-1,3,5)    |
//! | weight_for_age  | severe_deficit   | trapezoidal(-5,-5,-3.1,-2.9)|
//! |                 | deficit          | triangular(-3.1,-2.5,-1.9)  |
//! |                 | adequate         | trapezoidal(-2.1,0,1.9,2.1) |
//! |                 | excess           | trapezoidal(1.9,2.1,5,5)    |
//! | condition       | severely_stunted | triangular(0,0,45)          |
//! |                 | stunted          | triangular(40,60,80)        |
//! |                 | normal           | triangular(75,100,100)      |

use super::defuzzify::DefuzzMethod;
use super::membership::{LinguisticVariable, MembershipFunction::*};
use super::rules::{Antecedent, Rule};
use super::system::FuzzySystem;

pub const HEIGHT_FOR_AGE: &str = "height_for_age";
pub const WEIGHT_FOR_AGE: &str = "weight_for_age";
pub const CONDITION: &str = "condition";

/// Both input universes
pub const Z_MIN: f64 = -5.0;
pub const Z_MAX: f64 = 5.0;

pub fn height_for_age() -> LinguisticVariable {
    LinguisticVariable::new(HEIGHT_FOR_AGE, Z_MIN, Z_MAX)
        .term("very_short", Trapezoidal(-5.0, -5.0, -3.1, -2.9))
        .term("short", Triangular(-3.1, -2.5, -1.9))
        .term("normal", Trapezoidal(-2.1, -1.0, 3.0, 5.0))
}

pub fn weight_for_age() -> LinguisticVariable {
    LinguisticVariable::new(WEIGHT_FOR_AGE, Z_MIN, Z_MAX)
        .term("severe_deficit", Trapezoidal(-5.0, -5.0, -3.1, -2.9))
        .term("deficit", Triangular(-3.1, -2.5, -1.9))
        .term("adequate", Trapezoidal(-2.1, 0.0, 1.9, 2.1))
        .term("excess", Trapezoidal(1.9, 2.1, 5.0, 5.0))
}

pub fn condition() -> LinguisticVariable {
    LinguisticVariable::new(CONDITION, 0.0, 100.0)
        .term("severely_stunted", Triangular(0.0, 0.0, 45.0))
        .term("stunted", Triangular(40.0, 60.0, 80.0))
        .term("normal", Triangular(75.0, 100.0, 100.0))
}

pub fn rules() -> Vec<Rule> {
    let h = |label: &str| Antecedent::is(HEIGHT_FOR_AGE, label);
    let w = |label: &str| Antecedent::is(WEIGHT_FOR_AGE, label);

    vec![
        Rule::new(h("very_short").or(w("severe_deficit")), CONDITION, "severely_stunted"),
        Rule::new(h("short").and(w("adequate")), CONDITION, "stunted"),
        Rule::new(h("normal").and(w("deficit")), CONDITION, "stunted"),
        Rule::new(h("normal").and(w("adequate")), CONDITION, "normal"),
        Rule::new(h("short").and(w("deficit")), CONDITION, "severely_stunted"),
        Rule::new(h("very_short").and(w("excess")), CONDITION, "stunted"),
    ]
}

/// Height-for-age first, weight-for-age second
pub fn reference_system() -> FuzzySystem {
    FuzzySystem {
        inputs: vec![height_for_age(), weight_for_age()],
        output: condition(),
        rules: rules(),
        resolution: 1.0,
        defuzzification: DefuzzMethod::Centroid,
    }
}
