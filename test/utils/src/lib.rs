/// SSE body for a short streamed reply, split across uneven chunk
/// boundaries on purpose.
pub fn sse_reply_fixture() -> &'static str {
    return concat!(
        "event: token\n",
        "data: {\"delta\": \"Hel\"}\n",
        "\n",
        "event: token\n",
        "data: {\"delta\": \"lo, \"}\n",
        "\n",
        "event: token\n",
        "data: {\"delta\": \"world\"}\n",
        "\n",
        "event: done\n",
        "data: {\"messageId\": \"m-1\"}\n",
        "\n",
    );
}

pub fn note_fixture() -> &'static str {
    return r#"# 内科カルテ

**主訴**: 昨夜からの腹痛

**現病歴**: 昨夜より心窩部痛が持続。食後に増悪。嘔気あり、嘔吐なし。

**既往歴**: 特記事項なし

**アレルギー**: なし

**内服薬**: なし

**身体所見**: 未測定

**鑑別診断**: 急性胃炎、胃潰瘍、胆石症

**評価**: 消化器系疾患を疑う

**Plan**: 検査/処方/指導/フォローアップ
"#;
}
