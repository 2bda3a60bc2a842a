use uri_parts::{Field, Uri};

#[test]
fn at_symbol_in_query_does_not_become_userinfo() {
    let uri = Uri::parse("http://www.calyptus.eu/myfile.html?email=somebody@gmail.com");
    assert_eq!(uri.get(Field::User), None);
    assert_eq!(uri.get(Field::Host), Some("www.calyptus.eu"));
}

#[test]
fn at_symbol_in_a_rootless_query_does_not_become_userinfo() {
    let uri = Uri::parse("http://host?email=somebody@gmail.com");
    assert_eq!(uri.get(Field::User), None);
    assert_eq!(uri.get(Field::Host), Some("host"));
    assert_eq!(uri.get(Field::Query), Some("email=somebody@gmail.com"));
}

#[test]
fn colon_with_no_digits_is_not_a_port() {
    let uri = Uri::parse("http://host:/x");
    assert_eq!(uri.get(Field::Port), None);
    assert_eq!(uri.get(Field::Host), Some("host"));
}

#[test]
fn trailing_question_mark_and_hash_disappear() {
    assert_eq!(Uri::parse("http://host/?").to_string(), "http://host/");
    assert_eq!(Uri::parse("http://host/#").to_string(), "http://host/");
    assert_eq!(Uri::parse("http://host/?#").to_string(), "http://host/");
}

#[test]
fn parent_segments_cannot_escape_the_root() {
    let base = Uri::parse("http://host/a/");
    let uri = Uri::parse_with_base("../../../etc/passwd", &base);
    assert_eq!(uri.to_string(), "http://host/etc/passwd");
}

#[test]
fn malformed_percent_escapes_survive_decoding() {
    let uri = Uri::parse("http://host/x?k=100%&p=%zz&q=%4");
    let data = uri.get_data();
    assert_eq!(data[0], ("k".to_string(), "100%".to_string()));
    assert_eq!(data[1], ("p".to_string(), "%zz".to_string()));
    assert_eq!(data[2], ("q".to_string(), "%4".to_string()));
}

#[test]
fn file_scheme_with_empty_host_round_trips() {
    let uri = Uri::parse("file:///var/log/syslog");
    assert_eq!(uri.get(Field::Host), None);
    assert_eq!(uri.get(Field::Directory), Some("/var/log/"));
    assert_eq!(uri.to_string(), "file:///var/log/syslog");
}

#[test]
fn default_port_is_omitted_from_the_serialization() {
    assert_eq!(Uri::parse("http://host:80/x").to_string(), "http://host/x");
    assert_eq!(Uri::parse("https://host:443/x").to_string(), "https://host/x");
    // Non-default ports stay.
    assert_eq!(Uri::parse("http://host:8080/x").to_string(), "http://host:8080/x");
}

#[test]
fn newline_input_echoes_back_through_display() {
    let raw = "first line\nsecond line";
    assert_eq!(Uri::parse(raw).to_string(), raw);
}

#[test]
fn empty_input_produces_an_empty_record() {
    let uri = Uri::parse("");
    assert_eq!(uri.get(Field::File), None);
    assert_eq!(uri.to_string(), "");
}

#[test]
fn double_slashes_inside_a_path_collapse() {
    let uri = Uri::parse("http://host/a//b/f.html");
    assert_eq!(uri.get(Field::Directory), Some("/a/b/"));
}

#[test]
fn query_only_reference_keeps_the_base_directory() {
    let base = Uri::parse("http://host/a/index.html");
    let uri = Uri::parse_with_base("?page=2", &base);
    assert_eq!(uri.get(Field::Directory), Some("/a/"));
    assert_eq!(uri.get(Field::File), None);
    assert_eq!(uri.get(Field::Query), Some("page=2"));
}

#[test]
fn fragment_only_reference_keeps_the_base_directory() {
    let base = Uri::parse("http://host/a/");
    let uri = Uri::parse_with_base("#section", &base);
    assert_eq!(uri.to_string(), "http://host/a/#section");
}
