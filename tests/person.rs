use growth_standards::{InvalidInput, Person, Sex};

#[test]
fn defaults() {
    let person = Person::default();
    assert_eq!(person.gender().as_str(), "F");
    assert_eq!(person.age(), 5);
    assert_eq!(person.height(), 50.0);
    assert_eq!(person.weight(), 5.0);

    let built = Person::new("F", 5, 50.0, 5.0).expect("defaults are valid");
    assert_eq!(built, person);
}

#[test]
fn every_age_in_range_round_trips() {
    let mut person = Person::default();
    for age in 5..=19 {
        person.set_age(age).expect("age in range");
        assert_eq!(i64::from(person.age()), age);
    }
    for age in [-1, 0, 4, 20, 255, 256, i64::MAX] {
        assert_eq!(person.set_age(age), Err(InvalidInput::Age));
        assert_eq!(person.age(), 19);
    }
}

#[test]
fn height_bounds_are_inclusive() {
    let mut person = Person::default();
    for height in [50.0, 50.5, 150.0, 249.9, 250.0] {
        person.set_height(height).expect("height in range");
        assert_eq!(person.height(), height);
    }
    assert_eq!(person.set_height(49.9), Err(InvalidInput::Height));
    assert_eq!(person.set_height(250.1), Err(InvalidInput::Height));
    assert_eq!(person.set_height(" 172.5 "), Ok(()));
    assert_eq!(person.height(), 172.5);
    assert_eq!(person.set_height(180), Ok(()));
    assert_eq!(person.height(), 180.0);
}

#[test]
fn non_numeric_height_is_rejected() {
    let mut person = Person::default();
    for raw in ["cat", "", "12cm", "NaN", "inf"] {
        assert_eq!(person.set_height(raw), Err(InvalidInput::NotANumber { field: "Height" }));
    }
    assert_eq!(person.set_height(f64::NAN), Err(InvalidInput::NotANumber { field: "Height" }));
    assert_eq!(person.height(), 50.0);
}

#[test]
fn weight_bounds_are_inclusive() {
    let mut person = Person::default();
    for weight in [5.0, 50.0, 250.0] {
        person.set_weight(weight).expect("weight in range");
        assert_eq!(person.weight(), weight);
    }
    assert_eq!(person.set_weight(4.99), Err(InvalidInput::Weight));
    assert_eq!(person.set_weight("251"), Err(InvalidInput::Weight));
    assert_eq!(person.set_weight("cat"), Err(InvalidInput::NotANumber { field: "Weight" }));
    assert_eq!(person.weight(), 250.0);
}

#[test]
fn gender_spellings_normalize() {
    let mut person = Person::default();
    let cases = [
        ("m", "M"),
        ("M", "M"),
        ("male", "Male"),
        ("Male", "Male"),
        ("  MALE\t", "Male"),
        ("f", "F"),
        ("F", "F"),
        ("female", "Female"),
        (" fEmAlE ", "Female"),
    ];
    for (raw, canonical) in cases {
        person.set_gender(raw).expect("valid gender");
        assert_eq!(person.gender().as_str(), canonical);
    }
    assert_eq!(person.gender().sex(), Sex::Female);
}

#[test]
fn invalid_gender_keeps_previous_value() {
    let mut person = Person::default();
    person.set_gender("Male").unwrap();
    for raw in ["House", "", "x", "mal e", "females"] {
        assert_eq!(person.set_gender(raw), Err(InvalidInput::Gender));
    }
    assert_eq!(person.gender().as_str(), "Male");
    assert_eq!(person.gender().sex(), Sex::Male);
}

#[test]
fn new_rejects_any_bad_field() {
    assert_eq!(Person::new("House", 10, 150.0, 40.0), Err(InvalidInput::Gender));
    assert_eq!(Person::new("M", 20, 150.0, 40.0), Err(InvalidInput::Age));
    assert_eq!(Person::new("M", 10, 20.0, 40.0), Err(InvalidInput::Height));
    assert_eq!(Person::new("M", 10, 150.0, "heavy"), Err(InvalidInput::NotANumber { field: "Weight" }));
}

#[test]
fn bmi() {
    let mut person = Person::default();
    person.set_height(160.0).unwrap();
    person.set_weight(55.0).unwrap();
    let bmi = person.compute_bmi();
    assert_eq!(bmi, 55.0 / (1.6 * 1.6));
    assert!((bmi - 21.48).abs() < 0.01);
}

#[test]
fn error_messages() {
    assert_eq!(InvalidInput::Gender.to_string(), "Invalid gender.");
    assert_eq!(InvalidInput::Age.to_string(), "Age must be between 5 and 19.");
    assert_eq!(InvalidInput::Height.to_string(), "Height should be between 50 and 250 cm.");
    assert_eq!(InvalidInput::NotANumber { field: "Weight" }.to_string(), "Weight must be a valid number.");
}
