pub const TABLE: &str = r#"| Day | Date | Start | End | Minutes |
|-----|------|-------|-----|---------|
{% for slot in slots %}
| {{ slot.weekday }} | {{ slot.date }} | {{ slot.start }} | {{ slot.end }} | {{ slot.minutes }} |
{% endfor %}
{% if slots|length == 0 %}
(No free time in the next {{ lookahead_days }} workdays)
{% endif %}
"#;

pub const LIST: &str = r#"Free time over the next {{ lookahead_days }} workdays:
{% for slot in slots %}
- {{ slot.weekday }} {{ slot.date }}: {{ slot.start }} - {{ slot.end }}
{% else %}
- (none)
{% endfor %}
"#;
