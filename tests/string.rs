#[macro_use]
mod common;

#[cfg(test)]
mod string {
    tests! {
        concat in string is OK
        "foobar"
    }

    tests! {
        multiline in string is OK
        "one"
        "two"
    }

    tests! {
        no_escape_processing in string is OK
        "a\\nb"
    }

    tests! {
        unterminated in string is ERR 65
        "[line 1] Error: Unterminated string"
    }

    tests! {
        unterminated_multiline in string is ERR 65
        "[line 2] Error: Unterminated string"
    }
}
