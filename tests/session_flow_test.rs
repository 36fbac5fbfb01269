//! 编辑会话端到端流程测试
//!
//! 覆盖控制器公开接口的状态机行为：题目集合操作、题型切换、
//! 语言收敛、评分卡链接与同步、校验副作用、回退与发布守卫。
//! 依赖真实后端的测试默认忽略，需要手动运行：cargo test -- --ignored

use quiz_author::api::{QuestionResource, QuizResource, ScorecardResource};
use quiz_author::clients::QuizApiClient;
use quiz_author::models::{Criterion, EditorTab, InputType, QuestionType, ScorecardId};
use quiz_author::services::FailureField;
use quiz_author::workflow::{EditorEvent, NavDirection, QuizSessionController};
use quiz_author::{Config, ContentBlock};

fn controller() -> QuizSessionController {
    QuizSessionController::new(Config::default())
}

/// 构造一份两道题的已加载测验（客观题带答案 + 主观题待配评分卡）
fn loaded_quiz() -> QuizResource {
    QuizResource {
        title: "期中测验".to_string(),
        questions: vec![
            QuestionResource {
                id: Some("q-1".to_string()),
                question_type: QuestionType::Objective,
                input_type: InputType::Text,
                content: vec![ContentBlock::paragraph("下列说法正确的是？")],
                answer: vec![ContentBlock::paragraph("B")],
                scorecard_id: None,
                scorecard: None,
                context: None,
                coding_languages: Vec::new(),
            },
            QuestionResource {
                id: Some("q-2".to_string()),
                question_type: QuestionType::Subjective,
                input_type: InputType::Text,
                content: vec![ContentBlock::paragraph("谈谈你的看法")],
                answer: Vec::new(),
                scorecard_id: None,
                scorecard: None,
                context: None,
                coding_languages: Vec::new(),
            },
        ],
    }
}

fn filled_criterion(name: &str) -> Criterion {
    Criterion {
        name: name.to_string(),
        description: format!("{}的具体要求", name),
        min_score: 1,
        max_score: 5,
    }
}

// ========== 题目集合操作 ==========

#[test]
fn test_append_inherits_config_from_last_question() {
    let mut ctrl = controller();

    // 空会话追加用默认配置
    ctrl.append();
    assert_eq!(ctrl.session().len(), 1);
    let first = ctrl.session().current().unwrap();
    assert_eq!(first.config.question_type, QuestionType::Objective);
    assert_eq!(first.config.input_type, InputType::Text);

    // 把最后一道题改成编程题再追加，新题继承类型与语言限定
    ctrl.set_question_type(QuestionType::Coding);
    ctrl.set_coding_languages(vec!["python".to_string()]);
    ctrl.append();

    assert_eq!(ctrl.session().len(), 2);
    assert_eq!(ctrl.session().current_index, 1);
    assert_eq!(ctrl.session().active_tab, EditorTab::Question);
    let appended = ctrl.session().current().unwrap();
    assert_eq!(appended.config.question_type, QuestionType::Coding);
    assert_eq!(appended.config.coding_languages, vec!["python".to_string()]);
    // 内容来自模板，不是上一道题的拷贝
    assert!(!appended.content.is_empty());
}

#[test]
fn test_remove_last_question_empties_session() {
    let mut ctrl = controller();
    ctrl.append();
    ctrl.remove(0);

    assert!(ctrl.session().is_empty());
    assert_eq!(ctrl.session().current_index, 0);
    assert_eq!(ctrl.session().active_tab, EditorTab::Question);

    // 空会话上的删除是 no-op，不崩溃
    ctrl.remove(0);
    assert!(ctrl.session().is_empty());
}

#[test]
fn test_remove_clamps_pointer() {
    let mut ctrl = controller();
    ctrl.append();
    ctrl.append();
    ctrl.append();
    assert_eq!(ctrl.session().current_index, 2);

    // 删除末尾题目后指针钳回新末尾
    ctrl.remove(2);
    assert_eq!(ctrl.session().len(), 2);
    assert_eq!(ctrl.session().current_index, 1);
}

#[test]
fn test_navigate_clamps_at_boundaries() {
    let mut ctrl = controller();
    ctrl.append();
    ctrl.append();

    // 末尾继续向后不回绕
    ctrl.navigate(NavDirection::Next);
    assert_eq!(ctrl.session().current_index, 1);

    ctrl.navigate(NavDirection::Prev);
    ctrl.navigate(NavDirection::Prev);
    assert_eq!(ctrl.session().current_index, 0);
}

#[test]
fn test_navigate_resets_incompatible_tab() {
    let mut ctrl = controller();
    ctrl.append();
    ctrl.set_question_type(QuestionType::Subjective);
    ctrl.append();
    ctrl.set_question_type(QuestionType::Objective);

    // 回到主观题并打开评分卡标签页
    ctrl.navigate(NavDirection::Prev);
    ctrl.set_active_tab(EditorTab::Scorecard);
    assert_eq!(ctrl.session().active_tab, EditorTab::Scorecard);

    // 导航到客观题：评分卡标签页不合法，复位到题目页
    ctrl.navigate(NavDirection::Next);
    assert_eq!(ctrl.session().active_tab, EditorTab::Question);
}

#[test]
fn test_invalid_tab_request_is_ignored() {
    let mut ctrl = controller();
    ctrl.append();

    // 客观题没有评分卡标签页
    ctrl.set_active_tab(EditorTab::Scorecard);
    assert_eq!(ctrl.session().active_tab, EditorTab::Question);

    ctrl.set_active_tab(EditorTab::Answer);
    assert_eq!(ctrl.session().active_tab, EditorTab::Answer);
}

// ========== 题型切换与内容模板 ==========

#[test]
fn test_type_change_swaps_pristine_template_only() {
    let mut ctrl = controller();
    ctrl.append();
    let template_content = ctrl.session().current().unwrap().content.clone();

    // 原始模板内容在切换题型时被替换
    ctrl.set_question_type(QuestionType::Subjective);
    let swapped = ctrl.session().current().unwrap().content.clone();
    assert_ne!(swapped, template_content);

    // 用户编辑过的内容（块带 id）切换题型时原样保留
    let mut edited = ContentBlock::paragraph("我自己写的题干");
    edited.id = Some("block-1".to_string());
    ctrl.set_content(vec![edited.clone()]);
    ctrl.set_question_type(QuestionType::Coding);
    assert_eq!(ctrl.session().current().unwrap().content, vec![edited]);
}

// ========== 语言收敛 ==========

#[test]
fn test_exclusive_language_collapses_with_notice() {
    let mut ctrl = controller();
    ctrl.append();
    ctrl.set_question_type(QuestionType::Coding);
    ctrl.drain_events();

    // react 是独占环境，后选的胜出
    ctrl.set_coding_languages(vec![
        "python".to_string(),
        "javascript".to_string(),
        "react".to_string(),
    ]);

    assert_eq!(
        ctrl.session().current().unwrap().config.coding_languages,
        vec!["react".to_string()]
    );
    let events = ctrl.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, EditorEvent::Notice { .. })));
}

#[test]
fn test_css_auto_adds_html() {
    let mut ctrl = controller();
    ctrl.append();
    ctrl.set_question_type(QuestionType::Coding);

    ctrl.set_coding_languages(vec!["css".to_string()]);

    let languages = &ctrl.session().current().unwrap().config.coding_languages;
    assert!(languages.contains(&"css".to_string()));
    assert!(languages.contains(&"html".to_string()));
}

// ========== 评分卡链接与同步 ==========

#[test]
fn test_shared_scorecard_syncs_and_detaches() {
    let mut ctrl = controller();
    ctrl.append();
    ctrl.set_question_type(QuestionType::Subjective);
    ctrl.create_blank_scorecard();
    let shared_id = ctrl.session().questions[0]
        .config
        .scorecard_data
        .as_ref()
        .unwrap()
        .id
        .clone();
    assert!(matches!(shared_id, ScorecardId::Session(_)));

    // 第二道主观题从池里链接同一张评分卡
    ctrl.append();
    ctrl.set_question_type(QuestionType::Subjective);
    let source = ctrl.session().scorecard_pool[0].clone();
    ctrl.set_scorecard(&source);
    assert_eq!(
        ctrl.session().questions[1]
            .config
            .scorecard_data
            .as_ref()
            .unwrap()
            .id,
        shared_id
    );

    // 在第二道题上编辑，第一道题与池同步观察到新值
    let criteria = vec![filled_criterion("论证")];
    ctrl.update_scorecard(Some("共享评分卡"), Some(&criteria));
    assert_eq!(
        ctrl.session().questions[0]
            .config
            .scorecard_data
            .as_ref()
            .unwrap()
            .name,
        "共享评分卡"
    );
    assert_eq!(ctrl.session().scorecard_pool[0].criteria, criteria);

    // 摘除一处引用：另一道题仍在用，池内保留
    ctrl.clear_scorecard();
    assert!(ctrl.session().questions[1].config.scorecard_data.is_none());
    assert_eq!(ctrl.session().scorecard_pool.len(), 1);

    // 摘除最后一处引用：会话新建的评分卡从池中删除
    ctrl.navigate(NavDirection::Prev);
    ctrl.clear_scorecard();
    assert!(ctrl.session().scorecard_pool.is_empty());
}

#[test]
fn test_published_scorecard_edits_stay_local() {
    let mut ctrl = controller();
    let quiz = QuizResource {
        title: "测验".to_string(),
        questions: vec![
            QuestionResource {
                id: Some("q-1".to_string()),
                question_type: QuestionType::Subjective,
                input_type: InputType::Text,
                content: vec![ContentBlock::paragraph("第一问")],
                answer: Vec::new(),
                scorecard_id: Some(7),
                scorecard: None,
                context: None,
                coding_languages: Vec::new(),
            },
            QuestionResource {
                id: Some("q-2".to_string()),
                question_type: QuestionType::Subjective,
                input_type: InputType::Text,
                content: vec![ContentBlock::paragraph("第二问")],
                answer: Vec::new(),
                scorecard_id: Some(7),
                scorecard: None,
                context: None,
                coding_languages: Vec::new(),
            },
        ],
    };
    let org = vec![ScorecardResource {
        id: 7,
        title: "机构评分卡".to_string(),
        criteria: Vec::new(),
    }];
    ctrl.apply_load_result("task-1", quiz, org);

    // 已发布评分卡的编辑只改当前题目的本地拷贝
    ctrl.update_scorecard(Some("改名"), None);
    assert_eq!(
        ctrl.session().questions[0]
            .config
            .scorecard_data
            .as_ref()
            .unwrap()
            .name,
        "改名"
    );
    assert_eq!(
        ctrl.session().questions[1]
            .config
            .scorecard_data
            .as_ref()
            .unwrap()
            .name,
        "机构评分卡"
    );
    assert_eq!(ctrl.session().scorecard_pool[0].name, "机构评分卡");
}

// ========== 校验副作用 ==========

#[test]
fn test_validation_failure_navigates_and_highlights() {
    let mut ctrl = controller();
    ctrl.append();
    ctrl.set_correct_answer(vec![ContentBlock::paragraph("A")]);
    ctrl.append();
    ctrl.set_question_type(QuestionType::Coding);
    ctrl.set_coding_languages(vec!["python".to_string()]);
    ctrl.navigate(NavDirection::Prev);
    ctrl.drain_events();

    // 第二题缺标准答案：导航过去、切到答案页、高亮生效
    assert!(!ctrl.validate_before_publish());
    assert_eq!(ctrl.session().current_index, 1);
    assert_eq!(ctrl.session().active_tab, EditorTab::Answer);
    assert_eq!(
        ctrl.active_highlight(),
        Some((1, FailureField::CorrectAnswer))
    );

    let events = ctrl.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, EditorEvent::Highlight { question_index: 1, field: FailureField::CorrectAnswer })));
    assert!(events
        .iter()
        .any(|e| matches!(e, EditorEvent::ValidationFailed { .. })));
}

#[test]
fn test_validation_pass_has_no_side_effects() {
    let mut ctrl = controller();
    ctrl.append();
    ctrl.set_correct_answer(vec![ContentBlock::paragraph("答案")]);
    ctrl.drain_events();

    assert!(ctrl.validate_before_publish());
    assert!(ctrl.active_highlight().is_none());
    assert!(ctrl.drain_events().is_empty());
}

#[test]
fn test_highlight_expires_after_configured_delay() {
    let config = Config {
        highlight_clear_ms: 0,
        ..Config::default()
    };
    let mut ctrl = QuizSessionController::new(config);
    ctrl.append();
    ctrl.set_question_type(QuestionType::Subjective);

    assert!(!ctrl.validate_before_publish());
    // 清除延迟为零，高亮立即失效
    assert!(ctrl.active_highlight().is_none());
}

// ========== 加载与回退 ==========

#[test]
fn test_apply_load_result_resets_session_state() {
    let mut ctrl = controller();
    let title = ctrl.apply_load_result("task-9", loaded_quiz(), Vec::new());

    assert_eq!(title, "期中测验");
    assert!(ctrl.session().loaded);
    assert_eq!(ctrl.session().task_id.as_deref(), Some("task-9"));
    assert_eq!(ctrl.session().len(), 2);
    assert_eq!(ctrl.session().current_index, 0);
    assert_eq!(ctrl.session().active_tab, EditorTab::Question);
    assert!(ctrl
        .drain_events()
        .contains(&EditorEvent::SessionChanged));
}

#[test]
fn test_revert_restores_loaded_snapshot() {
    let mut ctrl = controller();
    ctrl.apply_load_result("task-9", loaded_quiz(), Vec::new());
    let snapshot = ctrl.session().questions.clone();

    // 大改一通：改内容、删题、加题
    ctrl.set_content(vec![ContentBlock::paragraph("改掉的题干")]);
    ctrl.remove(1);
    ctrl.append();
    ctrl.append();
    assert_ne!(ctrl.session().questions, snapshot);

    ctrl.revert();
    assert_eq!(ctrl.session().questions, snapshot);
}

#[test]
fn test_revert_without_snapshot_is_noop() {
    let mut ctrl = controller();
    ctrl.append();
    ctrl.revert();
    assert_eq!(ctrl.session().len(), 1);
}

#[tokio::test]
async fn test_load_deduplicated_per_task_id() {
    // 指向一个必然拒绝连接的地址：重复加载不应触网
    let config = Config {
        api_base_url: "http://127.0.0.1:9/api".to_string(),
        request_timeout_secs: 2,
        ..Config::default()
    };
    let client = QuizApiClient::new(&config).unwrap();
    let mut ctrl = QuizSessionController::new(config);
    ctrl.apply_load_result("task-1", loaded_quiz(), Vec::new());
    ctrl.drain_events();

    // 同一任务已加载过，再次加载直接返回，会话原样不动
    let title = ctrl.load(&client, "task-1").await;
    assert!(title.is_none());
    assert!(ctrl.session().loaded);
    assert_eq!(ctrl.session().len(), 2);
    // 走的是去重早退路径，没有任何加载事件产生
    assert!(ctrl.drain_events().is_empty());
}

// ========== 保存与发布守卫 ==========

#[tokio::test]
async fn test_save_without_task_is_noop() {
    let mut ctrl = controller();
    let client = QuizApiClient::new(&Config::default()).unwrap();
    ctrl.append();

    // 未加载任务时保存直接成功，不发请求
    assert!(ctrl.save(&client, "未命名").await.is_ok());
}

#[tokio::test]
async fn test_publish_blocked_by_validation() {
    let mut ctrl = controller();
    let client = QuizApiClient::new(&Config::default()).unwrap();
    ctrl.apply_load_result(
        "task-1",
        QuizResource {
            title: "空测验".to_string(),
            questions: Vec::new(),
        },
        Vec::new(),
    );

    // 空会话校验失败，发布返回 false 且不触网
    let published = ctrl.publish(&client, "空测验", None).await.unwrap();
    assert!(!published);
    assert!(!ctrl.session().publish_in_progress);
}

#[tokio::test]
async fn test_publish_failure_clears_guard_and_keeps_edits() {
    // 指向一个必然拒绝连接的地址
    let config = Config {
        api_base_url: "http://127.0.0.1:9/api".to_string(),
        request_timeout_secs: 2,
        ..Config::default()
    };
    let client = QuizApiClient::new(&config).unwrap();
    let mut ctrl = QuizSessionController::new(config);
    ctrl.apply_load_result("task-1", loaded_quiz(), Vec::new());

    // 给第二道主观题配齐评分卡，让整卷通过校验
    ctrl.navigate(NavDirection::Next);
    ctrl.create_blank_scorecard();
    ctrl.update_scorecard(Some("评分卡"), Some(&[filled_criterion("要点")]));
    assert!(ctrl.validate_before_publish());

    let result = ctrl.publish(&client, "期中测验", None).await;
    assert!(result.is_err());
    // 失败后守卫标志清除、内存编辑保留
    assert!(!ctrl.session().publish_in_progress);
    assert_eq!(ctrl.session().len(), 2);
}

// ========== 依赖真实后端 ==========

#[tokio::test]
#[ignore] // 默认忽略，需要本地后端：cargo test -- --ignored
async fn test_load_against_real_backend() {
    quiz_author::utils::logging::init();

    let config = Config::from_env();
    let client = QuizApiClient::new(&config).expect("创建客户端失败");
    let mut ctrl = QuizSessionController::new(config);

    let title = ctrl.load(&client, "task-demo").await;
    assert!(title.is_some(), "应该能加载到测验标题");
    assert!(ctrl.session().loaded);
}
