#[macro_use]
mod common;

#[cfg(test)]
mod field {
    tests! {
        get_and_set in field is OK
        "3"
    }

    tests! {
        fields_shadow_methods in field is OK
        "method"
        "field"
    }

    tests! {
        fields_are_per_instance in field is OK
        "first"
        "second"
    }

    tests! {
        undefined_property in field is ERR 70
        "Undefined property 'ghost'."
        "[line 2]"
    }

    tests! {
        get_on_non_instance in field is ERR 70
        "Only instances have properties."
        "[line 2]"
    }

    tests! {
        set_on_non_instance in field is ERR 70
        "Only instances have fields."
        "[line 2]"
    }
}
