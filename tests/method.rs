#[macro_use]
mod common;

#[cfg(test)]
mod method {
    tests! {
        bound_method_carries_this in method is OK
        "bound"
    }

    tests! {
        state_through_methods in method is OK
        "3"
    }

    tests! {
        classes_have_no_properties in method is ERR 70
        "Only instances have properties."
        "[line 2]"
    }
}
