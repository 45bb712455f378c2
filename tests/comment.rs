#[macro_use]
mod common;

#[cfg(test)]
mod comment {
    tests! {
        line_comment in comment is OK
        "after"
    }

    tests! {
        comment_at_end_of_file in comment is OK
        "ok"
    }

    tests! {
        only_a_comment in comment is OK
    }
}
