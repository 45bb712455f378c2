#[macro_use]
mod common;

#[cfg(test)]
mod number {
    tests! {
        whole in number is OK
        "1"
        "120"
        "-0"
    }

    tests! {
        decimal in number is OK
        "0.75"
        "12.34"
    }

    tests! {
        trailing_dot in number is ERR 65
        "[line 1] Error at ';': Expect property name after '.'."
    }
}
